// Sponsorship feed parser
//
// The feed is a tiny hand-maintained CSV file:
//
//   repo,ad_price,placement,sponsor_url
//   owner/name, 20, repo, https://...
//
// Humans edit it, so values get trimmed and column order is not assumed.
use tracing::{debug, warn};

use crate::{
    models::{Entry, Placement},
    Error, Result,
};

const REQUIRED_COLUMNS: [&str; 4] = ["repo", "ad_price", "placement", "sponsor_url"];

/// Column positions resolved from the header row
struct Columns {
    repo: usize,
    ad_price: usize,
    placement: usize,
    sponsor_url: usize,
}

impl Columns {
    fn from_header(header: &[String]) -> Result<Self> {
        let find = |name: &str| {
            header
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
                .ok_or_else(|| Error::FeedError(format!("missing column '{}' in header", name)))
        };

        Ok(Self {
            repo: find(REQUIRED_COLUMNS[0])?,
            ad_price: find(REQUIRED_COLUMNS[1])?,
            placement: find(REQUIRED_COLUMNS[2])?,
            sponsor_url: find(REQUIRED_COLUMNS[3])?,
        })
    }
}

/// Parse the whole feed into entries, in file order
///
/// Rows with a bad price or unknown placement are kept (the filter excludes
/// them later), rows too short to hold every column are skipped.
pub fn parse_feed(text: &str) -> Result<Vec<Entry>> {
    let mut rows = records(text)
        .into_iter()
        .filter(|(_, record)| !record.trim().is_empty());

    let (_, header_line) = rows
        .next()
        .ok_or_else(|| Error::FeedError("feed is empty, expected a header row".into()))?;
    let columns = Columns::from_header(&split_record(&header_line))?;

    let mut entries = Vec::new();
    for (line_no, record) in rows {
        let fields = split_record(&record);
        let field = |i: usize| fields.get(i).map(|f| f.trim());

        let (Some(repo), Some(price), Some(placement), Some(sponsor_url)) = (
            field(columns.repo),
            field(columns.ad_price),
            field(columns.placement),
            field(columns.sponsor_url),
        ) else {
            warn!("Skipping feed line {}: expected {} columns", line_no, REQUIRED_COLUMNS.len());
            continue;
        };

        let ad_price = parse_price(price);
        if ad_price.is_none() {
            warn!("Feed line {}: unparseable ad_price '{}'", line_no, price);
        }

        let placement = Placement::parse(placement);
        if !placement.is_known() {
            warn!("Feed line {}: unknown placement '{}'", line_no, placement);
        }

        entries.push(Entry {
            repo: repo.to_string(),
            ad_price,
            placement,
            sponsor_url: sponsor_url.to_string(),
        });
    }

    debug!("Parsed {} feed entries", entries.len());
    Ok(entries)
}

/// Non-negative decimal, a leading `$` is tolerated
fn parse_price(raw: &str) -> Option<f64> {
    raw.trim()
        .trim_start_matches('$')
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite() && *p >= 0.0)
}

/// Group physical lines into records, paired with their 1-based starting line
///
/// A line break inside a quoted field belongs to the field, so the record
/// continues until its quotes balance. `""` escapes count twice and never
/// flip the balance.
fn records(text: &str) -> Vec<(usize, String)> {
    let mut records = Vec::new();
    let mut pending: Option<(usize, String)> = None;

    for (index, line) in text.lines().enumerate() {
        let line = line.trim_end_matches('\r');
        let (start, mut record) = match pending.take() {
            Some((start, mut record)) => {
                record.push('\n');
                (start, record)
            }
            None => (index + 1, String::new()),
        };
        record.push_str(line);

        if record.matches('"').count() % 2 == 1 {
            pending = Some((start, record));
        } else {
            records.push((start, record));
        }
    }

    // Unterminated quote at the end of the file: keep what we have
    if let Some((start, record)) = pending {
        warn!("Feed line {}: unterminated quoted field", start);
        records.push((start, record));
    }

    records
}

/// Split one CSV record, honoring double quotes and `""` escapes
fn split_record(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.trim_end_matches('\r').chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);

    fields
}
