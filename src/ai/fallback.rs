//! Hardcoded suggestions used when no provider answers.

use super::types::Suggestions;
use crate::core::CustomerType;

/// Follow-up question and example answers for the audience step.
pub fn follow_up(kind: CustomerType) -> Suggestions {
    match kind {
        CustomerType::External => Suggestions::new(
            "Who are your customers?",
            "Help us understand your target customer demographics, behaviors, and specific needs",
            &[
                "Small business owners with specific demographics",
                "Tech-savvy users preferring mobile solutions",
                "Enterprise clients needing efficiency tools",
                "Freelancers requiring project management",
            ],
        ),
        CustomerType::Internal => Suggestions::new(
            "Which teams benefit?",
            "Identify the internal teams, departments, or stakeholders who will benefit from this solution",
            &[
                "HR teams managing employee processes",
                "Sales teams tracking relationships",
                "Operations teams handling workflows",
                "Finance teams managing budgets",
            ],
        ),
    }
}

/// Initial differentiator batch.
pub fn differentiators(kind: CustomerType) -> Suggestions {
    match kind {
        CustomerType::External => Suggestions::new(
            "Competitive strengths",
            "What makes your solution different from competitors",
            &[
                "10x faster processing: Minutes instead of hours",
                "Smart recommendations: Guidance competitors don't provide",
                "Zero-setup deployment: Start instantly without training",
                "Predictive insights: See trends before competitors",
            ],
        ),
        CustomerType::Internal => Suggestions::new(
            "Core advantages",
            "Why this solution beats current processes",
            &[
                "One-click automation: Eliminate 90% of manual work",
                "Real-time collaboration: Instant team sync",
                "Smart integrations: Connect existing tools effortlessly",
                "Predictive maintenance: Prevent issues before they happen",
            ],
        ),
    }
}

/// Pool drawn from, one at a time, when an incremental request fails.
pub fn incremental_pool(kind: CustomerType) -> &'static [&'static str] {
    match kind {
        CustomerType::External => {
            &["Advanced analytics", "Custom integrations", "24/7 support", "Mobile-first design"]
        }
        CustomerType::Internal => &[
            "Automated reporting",
            "Custom workflows",
            "Team notifications",
            "Data synchronization",
        ],
    }
}

/// Single-suggestion fallback: the pool, titled like the batch.
pub fn incremental(kind: CustomerType) -> Suggestions {
    let batch = differentiators(kind);
    Suggestions::new(&batch.title, &batch.description, incremental_pool(kind))
}
