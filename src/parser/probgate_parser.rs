// Probgate page parsing: contest gate, contest config, problem edit page
use crate::model::ParserError;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

static CONTEST_INFO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z]+)(\d+)\s+([A-Za-z]+)").expect("valid regex"));

static LINKED_PROBLEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[a\|https://probgate\.org/viewproblem\.php\?pid=(\d+)\]Link\[/a\]")
        .expect("valid regex")
});

const LINK_SUFFIX: &str = " (Link)";

/// One `id | name` row of a Probgate listing table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRow {
    pub id: String,
    pub name: String,
}

/// A contest problem row; `is_link` rows point at another problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemRow {
    pub problem_id: String,
    pub name: String,
    pub is_link: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContestInfo {
    pub month: String,
    pub year: String,
    pub division: String,
}

pub struct ProbgateParser;

impl ProbgateParser {
    pub fn new() -> Self {
        Self
    }

    /// Rows of every `table.subtable.sortable` on the contest gate page.
    pub fn parse_contest_list(&self, html: &str) -> Result<Vec<ListingRow>, ParserError> {
        let document = Html::parse_document(html);
        let table_selector = selector("table.subtable.sortable")?;

        let mut rows = Vec::new();
        let mut tables = 0;
        for table in document.select(&table_selector) {
            tables += 1;
            rows.extend(listing_rows(table)?);
        }
        if tables == 0 {
            return Err(ParserError::MissingField("contest tables".into()));
        }
        Ok(rows)
    }

    /// Problem rows under `div#problems`, with the " (Link)" marker removed.
    pub fn parse_contest_problems(&self, html: &str) -> Result<Vec<ProblemRow>, ParserError> {
        let document = Html::parse_document(html);
        let problems_selector = selector("div#problems")?;

        let problems_div = document
            .select(&problems_selector)
            .next()
            .ok_or_else(|| ParserError::MissingField("problems div".into()))?;

        Ok(listing_rows(problems_div)?
            .into_iter()
            .map(|row| match row.name.strip_suffix(LINK_SUFFIX) {
                Some(stripped) => ProblemRow {
                    problem_id: row.id,
                    name: stripped.to_string(),
                    is_link: true,
                },
                None => ProblemRow {
                    problem_id: row.id,
                    name: row.name,
                    is_link: false,
                },
            })
            .collect())
    }

    /// Target problem id of a link problem, read from its statement source.
    pub fn parse_linked_problem(&self, html: &str) -> Result<Option<String>, ParserError> {
        let document = Html::parse_document(html);
        let statement_selector = selector("textarea#statement_text")?;

        Ok(document
            .select(&statement_selector)
            .next()
            .map(|t| t.text().collect::<String>())
            .and_then(|content| {
                LINKED_PROBLEM
                    .captures(content.trim())
                    .map(|caps| caps[1].to_string())
            }))
    }

    /// Splits "DEC24 Bronze" into month code, two-digit year and division.
    pub fn parse_contest_info(&self, contest_name: &str) -> Option<ContestInfo> {
        let caps = CONTEST_INFO.captures(contest_name)?;
        Some(ContestInfo {
            month: caps[1].to_string(),
            year: caps[2].to_string(),
            division: caps[3].to_string(),
        })
    }

    pub fn is_login_rejected(&self, body: &str) -> bool {
        let body = body.to_lowercase();
        body.contains("incorrect") || body.contains("failed")
    }
}

fn listing_rows(container: ElementRef<'_>) -> Result<Vec<ListingRow>, ParserError> {
    let row_selector = selector("tr")?;
    let cell_selector = selector("td")?;
    let link_selector = selector("a")?;

    let mut rows = Vec::new();
    // first row is the table header
    for row in container.select(&row_selector).skip(1) {
        let cells: Vec<ElementRef<'_>> = row.select(&cell_selector).collect();
        if cells.len() < 2 {
            continue;
        }
        let Some(link) = cells[1].select(&link_selector).next() else {
            continue;
        };
        rows.push(ListingRow {
            id: cells[0].text().collect::<String>().trim().to_string(),
            name: link.text().collect::<String>().trim().to_string(),
        });
    }
    Ok(rows)
}

fn selector(css: &str) -> Result<Selector, ParserError> {
    Selector::parse(css).map_err(|e| ParserError::HtmlParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const GATE: &str = r#"<html><body>
        <table class="subtable sortable">
          <tr><th>ID</th><th>Contest</th></tr>
          <tr><td> 101 </td><td><a href="contest.php?cid=101">DEC24 Bronze</a></td></tr>
          <tr><td>102</td><td><a href="contest.php?cid=102">DEC24 Silver</a></td></tr>
          <tr><td>103</td><td>no link here</td></tr>
        </table>
        <table class="subtable sortable">
          <tr><th>ID</th><th>Contest</th></tr>
          <tr><td>55</td><td><a href="contest.php?cid=55">Practice Round</a></td></tr>
        </table>
        <table class="other"><tr><th>x</th></tr><tr><td>9</td><td><a>IGNORED</a></td></tr></table>
        </body></html>"#;

    #[test]
    fn parses_contest_gate_tables() {
        let rows = ProbgateParser::new().parse_contest_list(GATE).unwrap();
        assert_eq!(
            rows,
            vec![
                ListingRow { id: "101".into(), name: "DEC24 Bronze".into() },
                ListingRow { id: "102".into(), name: "DEC24 Silver".into() },
                ListingRow { id: "55".into(), name: "Practice Round".into() },
            ]
        );
    }

    #[test]
    fn contest_gate_without_tables_is_an_error() {
        let result = ProbgateParser::new().parse_contest_list("<p>Please log in</p>");
        assert!(matches!(result, Err(ParserError::MissingField(_))));
    }

    #[test]
    fn parses_contest_problems_and_link_marker() {
        let page = r##"<div id="problems"><table>
            <tr><th>PID</th><th>Name</th></tr>
            <tr><td>4001</td><td><a href="#">Roundabout Rounding</a></td></tr>
            <tr><td>4002</td><td><a href="#">Marathon Cheating (Bronze) (Link)</a></td></tr>
            </table></div>"##;
        let rows = ProbgateParser::new().parse_contest_problems(page).unwrap();
        assert_eq!(
            rows,
            vec![
                ProblemRow { problem_id: "4001".into(), name: "Roundabout Rounding".into(), is_link: false },
                ProblemRow {
                    problem_id: "4002".into(),
                    name: "Marathon Cheating (Bronze)".into(),
                    is_link: true,
                },
            ]
        );
    }

    #[test]
    fn missing_problems_div_is_an_error() {
        assert!(ProbgateParser::new().parse_contest_problems("<div></div>").is_err());
    }

    #[test]
    fn reads_linked_problem_id() {
        let page = r#"<textarea id="statement_text">
            [a|https://probgate.org/viewproblem.php?pid=3177]Link[/a]
            </textarea>"#;
        assert_eq!(
            ProbgateParser::new().parse_linked_problem(page).unwrap(),
            Some("3177".to_string())
        );
    }

    #[test]
    fn plain_statement_has_no_link() {
        let page = r#"<textarea id="statement_text">Bessie has N cows.</textarea>"#;
        assert_eq!(ProbgateParser::new().parse_linked_problem(page).unwrap(), None);
        assert_eq!(ProbgateParser::new().parse_linked_problem("<p></p>").unwrap(), None);
    }

    #[test]
    fn splits_contest_names() {
        let parser = ProbgateParser::new();
        assert_eq!(
            parser.parse_contest_info("OPEN22 Bronze"),
            Some(ContestInfo { month: "OPEN".into(), year: "22".into(), division: "Bronze".into() })
        );
        assert_eq!(parser.parse_contest_info("Practice Round"), None);
        assert_eq!(parser.parse_contest_info("DEC24"), None);
    }

    #[test]
    fn detects_rejected_login() {
        let parser = ProbgateParser::new();
        assert!(parser.is_login_rejected("<p>Password INCORRECT</p>"));
        assert!(parser.is_login_rejected("Login failed"));
        assert!(!parser.is_login_rejected("<a href='logout.php'>Logout</a>"));
    }
}
