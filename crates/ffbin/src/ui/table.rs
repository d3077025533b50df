use ffbin_fetch::{ProbeResult, Selection, Source, SourceList, format_speed};
use tabled::{
    Table, Tabled,
    settings::{Panel, Remove, Style, object::Rows},
};

#[derive(Debug, Clone, Default)]
pub struct Formatter {
    pub header: Option<String>,
    pub footer: Option<String>,
    pub hide_columns: bool,
}

impl Formatter {
    pub fn build<T: Tabled, I: IntoIterator<Item = T>>(self, data: I) -> Table {
        let mut table = Table::new(data);
        if self.hide_columns {
            table.with(Remove::row(Rows::first()));
        }
        if let Some(header) = self.header {
            table.with(Panel::header(header));
        }
        if let Some(footer) = self.footer {
            table.with(Panel::footer(footer));
        }

        table.with(Style::blank());
        table
    }
}

#[derive(Tabled)]
pub struct SourceRow<'a> {
    #[tabled(rename = "#")]
    pub index: usize,
    pub name: &'a str,
    pub url: &'a str,
}

impl<'a> SourceRow<'a> {
    pub fn rows(sources: &'a SourceList) -> impl Iterator<Item = SourceRow<'a>> {
        sources.iter().enumerate().map(|(index, source)| SourceRow {
            index: index + 1,
            name: &source.name,
            url: &source.base_url,
        })
    }
}

#[derive(Tabled)]
pub struct ProbeRow<'a> {
    #[tabled(rename = "#")]
    pub rank: usize,
    pub name: &'a str,
    pub speed: String,
    pub status: &'static str,
}

impl<'a> ProbeRow<'a> {
    pub fn new(rank: usize, result: &'a ProbeResult, best: Option<&Source>) -> Self {
        let status = if best == Some(&result.source) {
            "selected"
        } else if result.is_usable() {
            "ok"
        } else {
            "failed"
        };
        ProbeRow {
            rank: rank + 1,
            name: &result.source.name,
            speed: format_speed(result.throughput_bps),
            status,
        }
    }
}

/// Speed-test results, fastest first, with the winner in the footer.
pub fn selection_report(selection: &Selection) -> Table {
    let footer = match selection.best_result() {
        Some(best) => format!(
            "Fastest: {} at {}",
            best.source.name,
            format_speed(best.throughput_bps)
        ),
        None => "No source responded; using the configured order".to_string(),
    };
    let rows = selection
        .ranked()
        .into_iter()
        .enumerate()
        .map(|(rank, result)| ProbeRow::new(rank, result, selection.best.as_ref()));
    Formatter {
        footer: Some(footer),
        ..Default::default()
    }
    .build(rows)
}
