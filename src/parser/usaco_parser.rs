// usaco.org problem page parsing
use crate::model::{ParserError, ProblemSource, ProblemTitle, Sample, UsacoProblem};
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;

static PROBLEM_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Problem (\d+)\. (.+)$").expect("valid regex"));

static CONTEST_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^USACO (\d+) (December|January|February|US Open) Contest, (Bronze|Silver|Gold|Platinum)$",
    )
    .expect("valid regex")
});

pub struct UsacoParser;

impl UsacoParser {
    pub fn new() -> Self {
        Self
    }

    /// Parses a `viewproblem2` page. `Ok(None)` means the page exists but is
    /// not a contest problem (missing title or contest heading).
    pub fn parse(&self, id: u32, url: &str, html: &str) -> Result<Option<UsacoProblem>, ParserError> {
        let document = Html::parse_document(html);

        let heading_selector = selector("h2")?;
        let input_selector = selector("pre.in")?;
        let output_selector = selector("pre.out")?;

        let headings: Vec<String> = document
            .select(&heading_selector)
            .map(|h| h.text().collect::<String>().trim().to_string())
            .collect();

        let Some(problem) = headings.iter().find_map(|h| PROBLEM_HEADING.captures(h)) else {
            return Ok(None);
        };
        let Some(contest) = headings.iter().find_map(|h| CONTEST_HEADING.captures(h)) else {
            return Ok(None);
        };

        let place: u32 = problem[1]
            .parse()
            .map_err(|_| ParserError::MissingField("problem place".into()))?;
        let name = problem[2].trim().to_string();
        let year: u32 = contest[1]
            .parse()
            .map_err(|_| ParserError::MissingField("contest year".into()))?;
        let month = contest[2].to_string();
        let division = contest[3].to_string();

        let inputs = document
            .select(&input_selector)
            .map(|e| e.text().collect::<String>());
        let outputs = document
            .select(&output_selector)
            .map(|e| e.text().collect::<String>());
        let samples = inputs
            .zip(outputs)
            .map(|(input, output)| Sample { input, output })
            .collect();

        Ok(Some(UsacoProblem {
            id,
            url: url.to_string(),
            source: ProblemSource {
                source_string: format!("{} {} {}", year, month, division),
                year,
                contest: month,
                division,
            },
            submittable: true,
            title: ProblemTitle {
                title_string: format!("{}. {}", place, name),
                place,
                name,
            },
            input: "stdin".into(),
            output: "stdout".into(),
            samples,
        }))
    }
}

fn selector(css: &str) -> Result<Selector, ParserError> {
    Selector::parse(css).map_err(|e| ParserError::HtmlParseError(e.to_string()))
}
