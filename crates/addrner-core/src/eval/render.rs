//! Static HTML report of mispredicted documents.

use askama::Template;

use crate::doc::Document;
use crate::error::Result;
use crate::eval::{Example, mispredictions};
use crate::labels::Label;

/// Highlight colour for a label's entities.
fn color(label: Label) -> &'static str {
    match label {
        Label::AddressNumber | Label::AddressNumberPrefix | Label::AddressNumberSuffix => {
            "#7aecec"
        }
        Label::StreetName
        | Label::StreetNamePreModifier
        | Label::StreetNamePostModifier
        | Label::StreetNamePreType
        | Label::StreetNamePostType => "#bfeeb7",
        Label::StreetNamePreDirectional | Label::StreetNamePostDirectional => "#feca74",
        Label::OccupancyType
        | Label::OccupancyIdentifier
        | Label::SubaddressType
        | Label::SubaddressIdentifier
        | Label::BuildingName => "#aa9cfc",
        Label::UspsBoxGroupId
        | Label::UspsBoxGroupType
        | Label::UspsBoxId
        | Label::UspsBoxType => "#c887fb",
        Label::PlaceName | Label::StateName | Label::CountryName => "#ff9561",
        Label::ZipCode | Label::ZipPlus4 => "#9cc9cc",
        Label::CornerOf | Label::IntersectionSeparator | Label::LandmarkName => "#e4e7d2",
        Label::Recipient => "#ffeb80",
        Label::NotAddress => "#ddd",
    }
}

/// A run of document text, highlighted when it is an entity.
struct Segment<'a> {
    text: &'a str,
    is_entity: bool,
    label: &'static str,
    title: &'static str,
    color: &'static str,
}

struct Row<'a> {
    index: usize,
    reference: Vec<Segment<'a>>,
    predicted: Vec<Segment<'a>>,
}

#[derive(Template)]
#[template(path = "report.html")]
struct Report<'a> {
    total: usize,
    rows: Vec<Row<'a>>,
}

fn plain(text: &str) -> Segment<'_> {
    Segment {
        text,
        is_entity: false,
        label: "",
        title: "",
        color: "",
    }
}

fn segments(doc: &Document) -> Vec<Segment<'_>> {
    let text = doc.text();
    let mut out = Vec::new();
    let mut cursor = 0;
    for span in doc.ents() {
        if cursor < span.start {
            out.push(plain(&text[cursor..span.start]));
        }
        out.push(Segment {
            text: doc.span_text(span),
            is_entity: true,
            label: span.label.as_str(),
            title: span.label.description(),
            color: color(span.label),
        });
        cursor = span.end;
    }
    if cursor < text.len() {
        out.push(plain(&text[cursor..]));
    }
    out
}

/// Renders the mispredicted examples side by side, reference first.
pub fn render_html(examples: &[Example]) -> Result<String> {
    let rows = mispredictions(examples)
        .map(|(index, example)| Row {
            index,
            reference: segments(&example.reference),
            predicted: segments(&example.predicted),
        })
        .collect();
    let report = Report {
        total: examples.len(),
        rows,
    };
    Ok(report.render()?)
}
