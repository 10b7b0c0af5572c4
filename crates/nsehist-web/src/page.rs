//! HTML rendering.

use chrono::{Days, NaiveDate};
use nsehist_lib::{
    Configuration, Estimator, InstrumentType, OhlcvTable, Timeframe, normalize_index_name,
};

use crate::form::{DEFAULT_LOOKBACK_DAYS, html_date};
use crate::session::{JobStatus, Session};

/// Seconds between automatic reloads while a download runs.
const REFRESH_SECS: u32 = 2;

const STYLE: &str = "\
body{font-family:system-ui,sans-serif;max-width:60rem;margin:2rem auto;padding:0 1rem;color:#222}\
h1{font-size:1.6rem}\
fieldset{border:1px solid #ccc;border-radius:6px;margin-bottom:1rem}\
label{display:block;margin:.4rem 0}\
.notice{background:#fdecea;border-left:4px solid #d93025;padding:.6rem 1rem}\
.info{background:#e8f0fe;border-left:4px solid #1a73e8;padding:.6rem 1rem}\
.ok{background:#e6f4ea;border-left:4px solid #188038;padding:.6rem 1rem}\
.metrics{display:flex;gap:2rem}\
.metric b{display:block;font-size:1.3rem}\
.table{max-height:30rem;overflow:auto}\
table{border-collapse:collapse;width:100%}\
td,th{border-bottom:1px solid #eee;padding:.25rem .5rem;text-align:right}\
td:first-child,th:first-child,td:nth-child(2),th:nth-child(2){text-align:left}\
progress{width:100%}";

/// Escapes text for HTML element content and attribute values.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Renders the whole page for `session`.
#[must_use]
pub fn render(session: &Session, notice: Option<&str>, today: NaiveDate) -> String {
    let running = session.status() == JobStatus::Running;

    let mut body = String::new();
    body.push_str("<h1>NSE Historical Data Downloader</h1>");
    body.push_str(
        "<p>Daily, weekly or monthly OHLCV for NSE stocks, ETFs and indices, \
         built from the exchange's end-of-day bhav copies.</p>",
    );

    if let Some(notice) = notice {
        body.push_str(&format!("<p class=\"notice\">{}</p>", escape(notice)));
    }

    body.push_str(&render_form(session.config(), today, running));

    if let Some(config) = session.config() {
        body.push_str(&render_settings(config, session));
    }

    body.push_str(&match session.status() {
        JobStatus::Idle => String::new(),
        JobStatus::Running => render_progress(session),
        JobStatus::Completed => render_result(session),
        JobStatus::NoData => render_no_data(session),
        JobStatus::Failed => format!(
            "<p class=\"notice\">Download failed: {}</p>{}",
            escape(session.error().unwrap_or("unknown error")),
            RESET_BUTTON
        ),
    });

    let refresh = if running {
        format!("<meta http-equiv=\"refresh\" content=\"{REFRESH_SECS}\">")
    } else {
        String::new()
    };

    format!(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width,initial-scale=1\">{refresh}\
         <title>NSE Historical Data Downloader</title><style>{STYLE}</style></head>\
         <body>{body}</body></html>"
    )
}

const RESET_BUTTON: &str = "<form method=\"post\" action=\"/reset\">\
                            <button type=\"submit\">Start New Download</button></form>";

fn render_form(config: Option<&Configuration>, today: NaiveDate, running: bool) -> String {
    let instrument = config.map_or(InstrumentType::Index, Configuration::instrument_type);
    let timeframe = config.map_or(Timeframe::Daily, Configuration::timeframe);
    let symbol = config.map_or("NIFTY 50", Configuration::symbol);
    let default_from = today
        .checked_sub_days(Days::new(DEFAULT_LOOKBACK_DAYS))
        .unwrap_or(today);
    let (from, to) = config.map_or((default_from, today), |c| (c.range().start, c.range().end));
    let max = html_date(today);

    let radios: String = InstrumentType::all()
        .iter()
        .map(|t| {
            format!(
                "<label><input type=\"radio\" name=\"instrument\" value=\"{}\"{}> {}</label>",
                t.as_str(),
                if *t == instrument { " checked" } else { "" },
                t.label()
            )
        })
        .collect();

    let options: String = Timeframe::all()
        .iter()
        .map(|tf| {
            format!(
                "<option value=\"{}\"{}>{}</option>",
                tf.code(),
                if *tf == timeframe { " selected" } else { "" },
                tf.label()
            )
        })
        .collect();

    format!(
        "<form method=\"post\" action=\"/download\"><fieldset><legend>Instrument</legend>{radios}\
         <label>Symbol / index name <input type=\"text\" name=\"symbol\" value=\"{symbol}\" \
         placeholder=\"e.g. NIFTY 50, NIFTY BANK, RELIANCE, TCS\"></label></fieldset>\
         <fieldset><legend>Date range</legend>\
         <label>From <input type=\"date\" name=\"from\" value=\"{from}\" max=\"{max}\"></label>\
         <label>To <input type=\"date\" name=\"to\" value=\"{to}\" max=\"{max}\"></label></fieldset>\
         <fieldset><legend>Timeframe</legend><select name=\"timeframe\">{options}</select></fieldset>\
         <button type=\"submit\"{disabled}>Download Data</button></form>",
        symbol = escape(symbol),
        from = html_date(from),
        to = html_date(to),
        disabled = if running { " disabled" } else { "" },
    )
}

fn render_settings(config: &Configuration, session: &Session) -> String {
    let mut rows = vec![
        ("Type", config.instrument_type().label().to_string()),
        ("Symbol", config.symbol().to_string()),
    ];
    if config.instrument_type().is_index() {
        rows.push(("Index name", normalize_index_name(config.symbol())));
    }
    rows.push(("Range", config.range().to_string()));
    rows.push(("Timeframe", config.timeframe().label().to_string()));
    if let Some(estimate) = session.estimate() {
        rows.push(("Estimated records", format!("~{}", estimate.records)));
        rows.push((
            "Estimated time",
            format!("~{}", Estimator::format_duration(estimate.duration)),
        ));
    }

    let items: String = rows
        .iter()
        .map(|(k, v)| format!("<li><b>{k}:</b> {}</li>", escape(v)))
        .collect();
    format!("<div class=\"info\"><h2>Selected parameters</h2><ul>{items}</ul></div>")
}

fn render_progress(session: &Session) -> String {
    session.progress().map_or_else(
        || "<p>Starting download&hellip;</p><progress></progress>".to_string(),
        |p| {
            format!(
                "<p>Processing {} ({}/{}), {} trading days found</p>\
                 <progress value=\"{}\" max=\"{}\"></progress>",
                p.date.format("%d-%m-%Y"),
                p.position,
                p.total,
                p.matched,
                p.position,
                p.total
            )
        },
    )
}

fn render_no_data(session: &Session) -> String {
    let stats = session
        .stats()
        .map(|s| {
            format!(
                " ({} days checked, {} without a snapshot, {} failed)",
                s.days_processed, s.holidays, s.failed
            )
        })
        .unwrap_or_default();
    format!(
        "<div class=\"notice\"><p>No data found{stats}. Please check:</p><ul>\
         <li>the symbol or index name is spelled as NSE lists it</li>\
         <li>the date range contains trading days</li>\
         <li>the instrument type matches the symbol</li></ul></div>{RESET_BUTTON}"
    )
}

fn render_result(session: &Session) -> String {
    let Some(download) = session.result() else {
        return String::new();
    };
    let table = download.table();
    let stats = download.report().stats();

    let metrics = [
        ("Symbol", table.symbol().unwrap_or_default().to_string()),
        ("Total Records", table.len().to_string()),
        ("Highest Close", format_price(table.max_close())),
        ("Lowest Close", format_price(table.min_close())),
    ]
    .iter()
    .map(|(k, v)| format!("<div class=\"metric\">{k}<b>{}</b></div>", escape(v)))
    .collect::<String>();

    format!(
        "<p class=\"ok\">Downloaded {} trading days ({} without a snapshot, {} failed).</p>\
         <div class=\"metrics\">{metrics}</div><div class=\"table\">{}</div>\
         <p><a href=\"/export.csv\" download>Download CSV</a></p>{RESET_BUTTON}",
        stats.matched,
        stats.holidays,
        stats.failed,
        render_table(table)
    )
}

fn format_price(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

fn render_table(table: &OhlcvTable) -> String {
    let rows: String = table
        .iter()
        .map(|r| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{:.2}</td><td>{:.2}</td><td>{:.2}</td>\
                 <td>{:.2}</td><td>{}</td></tr>",
                escape(&r.symbol),
                escape(&r.date),
                r.open,
                r.high,
                r.low,
                r.close,
                r.volume
            )
        })
        .collect();
    format!(
        "<table><thead><tr><th>Symbol</th><th>Date</th><th>Open</th><th>High</th>\
         <th>Low</th><th>Close</th><th>Volume</th></tr></thead><tbody>{rows}</tbody></table>"
    )
}
