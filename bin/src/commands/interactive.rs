//! Interactive download flow.

use crate::display::{self, Format};
use anyhow::{Context, Result};
use inquire::error::{CustomUserError, InquireError};
use inquire::validator::Validation;
use inquire::{Confirm, Select, Text};
use nsehist_lib::prelude::*;
use nsehist_lib::{InputError, parse_date};

/// Prompts for every setting, downloads, and writes a CSV file.
pub(crate) async fn interactive(quiet: bool) -> Result<()> {
    display::print_banner();

    let config = match prompt_configuration() {
        Ok(Some(config)) => config,
        Ok(None) => return Ok(()),
        Err(e) if is_cancel(&e) => {
            println!("\n\nDownload cancelled by user.");
            return Ok(());
        }
        Err(e) => return Err(e).context("Prompt failed"),
    };

    let estimate = Estimator::default().estimate(config.range(), config.timeframe());
    display::print_settings(&config, &estimate);

    let proceed = match Confirm::new("Proceed with download?")
        .with_default(true)
        .prompt()
    {
        Ok(proceed) => proceed,
        Err(e) if is_cancel(&e) => false,
        Err(e) => return Err(e).context("Prompt failed"),
    };
    if !proceed {
        println!("Download cancelled by user.");
        return Ok(());
    }

    let Some(done) = super::fetch(&config, quiet).await? else {
        return Ok(());
    };

    display::print_summary(&done);
    let path = display::default_output(&done, &config, Format::Csv);
    display::write_output(&done, &path, Format::Csv, false)?;
    println!("\nData saved to: {}", path.display());

    Ok(())
}

/// Asks for the settings. `None` means the input was rejected and the
/// reason printed.
fn prompt_configuration() -> Result<Option<Configuration>, InquireError> {
    let instrument = Select::new("Instrument type:", InstrumentType::all().to_vec()).prompt()?;

    let symbol = Text::new(match instrument {
        InstrumentType::Index => "Index name (e.g. NIFTY 50, NIFTY BANK):",
        InstrumentType::Stock => "Symbol (e.g. RELIANCE, TCS, NIFTYBEES):",
    })
    .with_validator(|input: &str| {
        Ok::<_, CustomUserError>(if input.trim().is_empty() {
            Validation::Invalid(InputError::EmptySymbol.to_string().into())
        } else {
            Validation::Valid
        })
    })
    .prompt()?;

    let from = prompt_date("From date (DD-MM-YYYY):")?;
    let to = prompt_date("To date (DD-MM-YYYY):")?;

    let labels: Vec<&str> = Timeframe::all().iter().map(Timeframe::label).collect();
    let choice = Select::new("Timeframe:", labels).raw_prompt()?;
    let timeframe = Timeframe::all()
        .get(choice.index)
        .copied()
        .unwrap_or_default();

    match Configuration::from_strings(instrument, &symbol, &from, &to, timeframe) {
        Ok(config) => Ok(Some(config)),
        Err(e) => {
            println!("Error: {e}");
            Ok(None)
        }
    }
}

fn prompt_date(message: &str) -> Result<String, InquireError> {
    Text::new(message)
        .with_validator(|input: &str| {
            Ok::<_, CustomUserError>(match parse_date(input) {
                Ok(_) => Validation::Valid,
                Err(e) => Validation::Invalid(e.to_string().into()),
            })
        })
        .prompt()
}

fn is_cancel(error: &InquireError) -> bool {
    matches!(
        error,
        InquireError::OperationCanceled | InquireError::OperationInterrupted
    )
}

