//! Starter blueprint built from a completed wizard run.

use chrono::NaiveDate;

use super::{AnswerMap, CustomerType};
use crate::editor::{Block, Document};

/// Sections every blueprint covers, in order.
pub const BLUEPRINT_SECTIONS: [&str; 6] = [
    "Executive Summary",
    "Market Analysis & Competitive Landscape",
    "Product/Service Strategy",
    "Financial Projections & Revenue Model",
    "Implementation Roadmap",
    "Risk Assessment & Mitigation",
];

/// Build the starter document for today's date.
pub fn starter_blueprint(answers: &AnswerMap) -> Document {
    starter_blueprint_on(answers, chrono::Local::now().date_naive())
}

/// Build the starter document: an overview of the answers, the chosen
/// differentiators, then one heading per blueprint section followed by an
/// AI placeholder.
pub fn starter_blueprint_on(answers: &AnswerMap, date: NaiveDate) -> Document {
    let mut doc = Document::new();

    doc.push(Block::Heading { level: 1, text: "Business Blueprint".into() });
    doc.push(Block::Paragraph(format!("Generated {}", date.format("%B %-d, %Y"))));

    doc.push(Block::Heading { level: 2, text: "Overview".into() });
    let customer_type = answers.customer_type();
    let kind = (!customer_type.is_empty()).then(|| CustomerType::classify(customer_type));
    let overview = [
        ("Audience", kind.map(|k| k.title().to_string()).unwrap_or_default()),
        ("Problem", answers.problem().to_string()),
        ("Location", answers.location().to_string()),
        (
            kind.map_or("Customer focus", |k| k.audience_label()),
            answers.customer_focus().to_string(),
        ),
    ];
    for (label, value) in overview {
        if !value.trim().is_empty() {
            doc.push(Block::Paragraph(format!("{label}: {}", value.trim())));
        }
    }

    let features = answers.key_features();
    if !features.is_empty() {
        doc.push(Block::Heading { level: 2, text: "Key Differentiators".into() });
        doc.push(Block::List { ordered: false, items: features.iter().map(|f| escape_item(f)).collect() });
    }

    for section in BLUEPRINT_SECTIONS {
        doc.push(Block::Heading { level: 2, text: section.to_string() });
        doc.push(Block::AiPlaceholder);
    }

    doc.push(Block::Paragraph(String::new()));
    doc
}

// List items carry inline markup
fn escape_item(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
