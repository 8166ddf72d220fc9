use crate::{format::compact_number, models::Listing, Error, Result};
use std::path::Path;

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Table,
        ExportFormat::Json,
        ExportFormat::Csv,
        ExportFormat::Markdown,
    ];

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(ExportFormat::Json),
            "csv" => Some(ExportFormat::Csv),
            "md" | "markdown" => Some(ExportFormat::Markdown),
            "txt" => Some(ExportFormat::Table),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Table => "txt",
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Markdown => "md",
        }
    }
}

/// Renders a list of listings for humans or other programs
pub struct Exporter;

impl Exporter {
    /// Export to a file, format picked from the extension
    pub fn export_to_file<P: AsRef<Path>>(listings: &[&Listing], path: P) -> Result<()> {
        let path = path.as_ref();

        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(ExportFormat::from_extension)
            .ok_or_else(|| {
                let known: Vec<String> = ExportFormat::ALL
                    .iter()
                    .map(|f| format!(".{}", f.extension()))
                    .collect();
                Error::ConfigError(format!(
                    "Could not determine export format from extension. Use one of {}",
                    known.join(", ")
                ))
            })?;

        std::fs::write(path, Self::render(listings, format)?)?;
        Ok(())
    }

    pub fn render(listings: &[&Listing], format: ExportFormat) -> Result<String> {
        Ok(match format {
            ExportFormat::Table => Self::to_table(listings),
            ExportFormat::Json => Self::to_json(listings)?,
            ExportFormat::Csv => Self::to_csv(listings),
            ExportFormat::Markdown => Self::to_markdown(listings),
        })
    }

    pub fn to_json(listings: &[&Listing]) -> Result<String> {
        Ok(serde_json::to_string_pretty(listings)?)
    }

    /// One block per listing, roughly what a card on the site shows
    pub fn to_table(listings: &[&Listing]) -> String {
        let mut output = String::new();

        for listing in listings {
            let repo = &listing.repository;
            let entry = &listing.entry;

            output.push_str(&format!(
                "{}  ⭐ {}  [{}]\n",
                repo.full_name,
                compact_number(repo.stargazers_count as f64),
                entry.placement.badges().join(", ")
            ));
            if let Some(desc) = repo.description.as_deref().filter(|d| !d.is_empty()) {
                output.push_str(&format!("  {}\n", desc));
            }
            if !repo.topics.is_empty() {
                output.push_str(&format!("  topics: {}\n", repo.topics.join(", ")));
            }
            output.push_str(&format!("  {}\n", entry.pitch()));
            output.push_str(&format!("  sponsor: {}\n\n", entry.sponsor_url));
        }

        output.push_str(&format!("{} repositories\n", listings.len()));
        output
    }

    pub fn to_csv(listings: &[&Listing]) -> String {
        let mut output = String::new();

        output.push_str("repo,stars,ad_price,placement,topics,description,homepage,sponsor_url\n");

        for listing in listings {
            let repo = &listing.repository;
            let entry = &listing.entry;

            output.push_str(&format!(
                "{},{},{},{},{},{},{},{}\n",
                Self::escape_csv(&repo.full_name),
                repo.stargazers_count,
                entry.ad_price.map(|p| p.to_string()).unwrap_or_default(),
                Self::escape_csv(entry.placement.as_str()),
                Self::escape_csv(&repo.topics.join(" ")),
                Self::escape_csv(repo.description.as_deref().unwrap_or("")),
                Self::escape_csv(repo.homepage.as_deref().unwrap_or("")),
                Self::escape_csv(&entry.sponsor_url),
            ));
        }

        output
    }

    pub fn to_markdown(listings: &[&Listing]) -> String {
        let mut output = String::new();

        output.push_str("# Sponsorable Repositories\n\n");
        output.push_str(&format!(
            "*Exported on {} - {} repositories*\n\n",
            chrono::Utc::now().format("%Y-%m-%d %H:%M UTC"),
            listings.len()
        ));

        output.push_str("| Repository | Stars | Price / month | Placement | Topics | Sponsor |\n");
        output.push_str("|------------|-------|---------------|-----------|--------|---------|\n");

        for listing in listings {
            let repo = &listing.repository;
            let entry = &listing.entry;

            output.push_str(&format!(
                "| [{}]({}) | {} | {} | {} | {} | [link]({}) |\n",
                Self::escape_markdown(&repo.full_name),
                repo.html_url,
                compact_number(repo.stargazers_count as f64),
                entry
                    .ad_price
                    .map(|p| format!("${}", compact_number(p)))
                    .unwrap_or_else(|| "-".to_string()),
                entry.placement.badges().join(" + "),
                Self::escape_markdown(&repo.topics.join(", ")),
                entry.sponsor_url,
            ));
        }

        output
    }

    fn escape_csv(s: &str) -> String {
        if s.contains(',') || s.contains('"') || s.contains('\n') {
            format!("\"{}\"", s.replace('"', "\"\""))
        } else {
            s.to_string()
        }
    }

    fn escape_markdown(s: &str) -> String {
        s.replace('|', "\\|")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Entry, Placement, RepositoryMetadata, RepositoryOwner};

    fn listing() -> Listing {
        Listing::new(
            RepositoryMetadata {
                id: 1,
                name: "hello".into(),
                full_name: "octo/hello".into(),
                description: Some("Says hello, loudly".into()),
                homepage: None,
                topics: vec!["cli".into(), "rust".into()],
                stargazers_count: 1500,
                owner: RepositoryOwner {
                    login: "octo".into(),
                    avatar_url: String::new(),
                },
                html_url: "https://github.com/octo/hello".into(),
            },
            Entry {
                repo: "octo/hello".into(),
                ad_price: Some(25.0),
                placement: Placement::Both,
                sponsor_url: "https://sponsor.me/hello".into(),
            },
        )
    }

    #[test]
    fn test_csv_escapes_commas() {
        let l = listing();
        let csv = Exporter::to_csv(&[&l]);
        assert!(csv.starts_with("repo,stars,ad_price"));
        assert!(csv.contains("octo/hello,1500,25,both,cli rust,\"Says hello, loudly\",,https://sponsor.me/hello"));
    }

    #[test]
    fn test_table_shows_card_content() {
        let l = listing();
        let table = Exporter::to_table(&[&l]);
        assert!(table.contains("octo/hello  ⭐ 1.5k  [website, readme]"));
        assert!(table.contains("both the README and the website"));
        assert!(table.ends_with("1 repositories\n"));
    }

    #[test]
    fn test_json_is_valid() {
        let l = listing();
        let json = Exporter::to_json(&[&l]).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["entry"]["placement"], "both");
        assert_eq!(parsed[0]["repository"]["stargazers_count"], 1500);
    }

    #[test]
    fn test_markdown_table() {
        let l = listing();
        let md = Exporter::to_markdown(&[&l]);
        assert!(md.contains("| [octo/hello](https://github.com/octo/hello) | 1.5k | $25 | website + readme |"));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ExportFormat::from_extension("JSON"), Some(ExportFormat::Json));
        assert_eq!(ExportFormat::from_extension("markdown"), Some(ExportFormat::Markdown));
        assert_eq!(ExportFormat::from_extension("xlsx"), None);

        for format in ExportFormat::ALL {
            assert_eq!(ExportFormat::from_extension(format.extension()), Some(format));
        }
    }

    #[test]
    fn test_unknown_extension_lists_supported_ones() {
        let dir = tempfile::tempdir().unwrap();
        let l = listing();

        let err = Exporter::export_to_file(&[&l], dir.path().join("out.xlsx")).unwrap_err();
        assert!(err.to_string().contains(".txt, .json, .csv, .md"));

        let path = dir.path().join("out.md");
        Exporter::export_to_file(&[&l], &path).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("octo/hello"));
    }
}
