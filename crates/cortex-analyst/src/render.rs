//! Turns analyst content blocks into a view tree.
//!
//! The renderer never draws anything itself. It produces [`Element`]s that the shell
//! walks and draws however it likes, which keeps the same output usable from a terminal,
//! a test, or a server response.
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::backend::base::{QueryBackend, QueryResult};
use crate::errors::{AnalystError, AnalystResult};
use crate::models::content::{ContentBlock, SqlContent};

pub const SUGGESTIONS_TITLE: &str = "Suggestions";
pub const SQL_TITLE: &str = "SQL Query";
pub const RESULTS_TITLE: &str = "Results";
pub const DATA_TAB: &str = "Data";
pub const LINE_TAB: &str = "Line Chart";
pub const BAR_TAB: &str = "Bar Chart";

/// Identity of one clickable suggestion: the exchange it belongs to and its position
/// among that exchange's suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SuggestionKey {
    pub exchange: usize,
    pub index: usize,
}

impl SuggestionKey {
    pub fn new(exchange: usize, index: usize) -> Self {
        Self { exchange, index }
    }
}

impl fmt::Display for SuggestionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.exchange, self.index)
    }
}

impl FromStr for SuggestionKey {
    type Err = AnalystError;

    /// Accepts `3_1` as displayed, or `3.1`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || AnalystError::UnknownSuggestion(s.to_string());
        let (exchange, index) = s.trim().split_once(['_', '.']).ok_or_else(unknown)?;
        Ok(Self {
            exchange: exchange.parse().map_err(|_| unknown())?,
            index: index.parse().map_err(|_| unknown())?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub points: Vec<Option<f64>>,
}

/// Chart view of a result: one category per row, one series per plotted column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub index_name: Option<String>,
    pub categories: Vec<String>,
    pub series: Vec<Series>,
}

impl Chart {
    /// With more than one column the first one becomes the category axis,
    /// otherwise rows are indexed by position.
    pub fn from_result(result: &QueryResult) -> Self {
        let rows = 0..result.row_count();
        let (index_name, categories, first_series): (Option<String>, Vec<String>, usize) =
            if result.column_count() > 1 {
                (
                    Some(result.columns[0].name.clone()),
                    rows.clone().map(|row| result.cell_text(row, 0)).collect(),
                    1,
                )
            } else {
                (None, rows.clone().map(|row| row.to_string()).collect(), 0)
            };

        let series = result
            .columns
            .iter()
            .enumerate()
            .skip(first_series)
            .map(|(column, c)| Series {
                name: c.name.clone(),
                points: rows
                    .clone()
                    .map(|row| numeric(result.rows[row].get(column)))
                    .collect(),
            })
            .collect();

        Chart {
            index_name,
            categories,
            series,
        }
    }
}

fn numeric(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tab {
    pub label: String,
    pub content: Element,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Element {
    Markdown { text: String },
    Expander {
        title: String,
        expanded: bool,
        children: Vec<Element>,
    },
    Suggestion { key: SuggestionKey, label: String },
    Code { language: String, source: String },
    Table { result: QueryResult },
    Tabs { tabs: Vec<Tab> },
    LineChart { chart: Chart },
    BarChart { chart: Chart },
    Error { message: String },
}

impl Element {
    pub fn markdown<S: Into<String>>(text: S) -> Self {
        Element::Markdown { text: text.into() }
    }

    pub fn expander<S: Into<String>>(title: S, expanded: bool, children: Vec<Element>) -> Self {
        Element::Expander {
            title: title.into(),
            expanded,
            children,
        }
    }

    /// Visit this element and every nested one, depth first
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Element)) {
        visit(self);
        match self {
            Element::Expander { children, .. } => {
                for child in children {
                    child.walk(visit);
                }
            }
            Element::Tabs { tabs } => {
                for tab in tabs {
                    tab.content.walk(visit);
                }
            }
            _ => {}
        }
    }
}

/// Every suggestion reachable from `elements`, in display order
pub fn suggestions(elements: &[Element]) -> Vec<(SuggestionKey, &str)> {
    let mut found = Vec::new();
    for element in elements {
        element.walk(&mut |e| {
            if let Element::Suggestion { key, label } = e {
                found.push((*key, label.as_str()));
            }
        });
    }
    found
}

/// Output of rendering one message: the view plus any query failures shown inline
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rendered {
    pub elements: Vec<Element>,
    pub failures: Vec<AnalystError>,
}

pub struct ContentRenderer {
    backend: Box<dyn QueryBackend>,
}

impl ContentRenderer {
    pub fn new(backend: Box<dyn QueryBackend>) -> Self {
        Self { backend }
    }

    /// Render `blocks` in order. `exchange_id` scopes suggestion keys so suggestions from
    /// different exchanges never collide.
    pub async fn render(&self, blocks: &[ContentBlock], exchange_id: usize) -> Rendered {
        let mut rendered = Rendered::default();
        let mut suggestion_index = 0;

        for block in blocks {
            match block {
                ContentBlock::Text(text) => {
                    rendered.elements.push(Element::markdown(text.text.clone()));
                }
                ContentBlock::Suggestions(content) => {
                    let children = content
                        .suggestions
                        .iter()
                        .map(|label| {
                            let key = SuggestionKey::new(exchange_id, suggestion_index);
                            suggestion_index += 1;
                            Element::Suggestion {
                                key,
                                label: label.clone(),
                            }
                        })
                        .collect();
                    rendered
                        .elements
                        .push(Element::expander(SUGGESTIONS_TITLE, true, children));
                }
                ContentBlock::Sql(sql) => {
                    let results = match self.render_sql(sql).await {
                        Ok(results) => results,
                        Err(err) => {
                            tracing::warn!(exchange_id, "query failed: {}", err);
                            let message = err.to_string();
                            rendered.failures.push(err);
                            vec![Element::Error { message }]
                        }
                    };
                    rendered.elements.push(Element::expander(
                        SQL_TITLE,
                        false,
                        vec![Element::Code {
                            language: "sql".to_string(),
                            source: sql.statement.clone(),
                        }],
                    ));
                    rendered
                        .elements
                        .push(Element::expander(RESULTS_TITLE, true, results));
                }
            }
        }

        rendered
    }

    async fn render_sql(&self, sql: &SqlContent) -> AnalystResult<Vec<Element>> {
        let result = self.backend.execute(&sql.statement).await?;

        if result.row_count() > 1 {
            let chart = Chart::from_result(&result);
            Ok(vec![Element::Tabs {
                tabs: vec![
                    Tab {
                        label: DATA_TAB.to_string(),
                        content: Element::Table { result },
                    },
                    Tab {
                        label: LINE_TAB.to_string(),
                        content: Element::LineChart {
                            chart: chart.clone(),
                        },
                    },
                    Tab {
                        label: BAR_TAB.to_string(),
                        content: Element::BarChart { chart },
                    },
                ],
            }])
        } else {
            Ok(vec![Element::Table { result }])
        }
    }
}
