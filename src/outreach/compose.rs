//! Personalized outreach composition.
//!
//! Pure string templating over a `ReactorRecord` and the post the contact
//! reacted to. Subject and opening vary with connection degree and role so
//! consecutive drafts do not read identically.

use crate::extraction::reactors::{ConnectionDegree, ReactorRecord};

/// Context about the post and the sender, injected by the caller.
#[derive(Debug, Clone)]
pub struct PostContext {
    /// What the post was about, used in subjects and openings.
    pub topic: String,
    /// Scheduling link appended when set.
    pub calendar_link: Option<String>,
    pub sender_name: String,
    pub sender_title: String,
    pub sender_company: String,
}

impl Default for PostContext {
    fn default() -> Self {
        Self {
            topic: "my recent post".to_string(),
            calendar_link: None,
            sender_name: "[Your Name]".to_string(),
            sender_title: "[Your Title]".to_string(),
            sender_company: "[Your Company]".to_string(),
        }
    }
}

/// A composed email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailContent {
    pub subject: String,
    pub body: String,
}

/// Compose a personalized email for one reactor.
pub fn compose_email(record: &ReactorRecord, context: &PostContext) -> EmailContent {
    let first_name = record.name.split_whitespace().next().unwrap_or("there");

    let subject = match record.connection_degree {
        ConnectionDegree::First => {
            format!("Great connecting on LinkedIn, {first_name}!")
        }
        _ => format!("Your interest in {} caught my attention", context.topic),
    };

    let opening = personalized_opening(record);
    let relationship = connection_line(record.connection_degree);
    let work_clause = record
        .company
        .as_deref()
        .map(|company| format!(" at {company}"))
        .unwrap_or_default();
    let scheduling = match &context.calendar_link {
        Some(link) => format!(
            "Would you be open to a quick 15-minute chat? You can grab any time \
             that works for you here:\n{link}"
        ),
        None => "Would you be open to a brief coffee chat or video call in the \
                 coming weeks?"
            .to_string(),
    };

    let body = format!(
        "Hi {first_name},\n\n\
         I noticed you reacted to {topic} and wanted to reach out personally to \
         thank you for the engagement.\n\n\
         {opening}\n\n\
         I'd love to learn more about your work{work_clause}. {relationship}\n\n\
         {scheduling}\n\n\
         Best regards,\n\
         {sender_name}\n\
         {sender_title}\n\
         {sender_company}\n",
        topic = context.topic,
        sender_name = context.sender_name,
        sender_title = context.sender_title,
        sender_company = context.sender_company,
    );

    EmailContent { subject, body }
}

/// Opening line keyed off the contact's role, falling back to their company.
fn personalized_opening(record: &ReactorRecord) -> String {
    let title = record.title.as_deref().unwrap_or("").to_lowercase();

    if title.contains("engineer") || title.contains("developer") {
        return "As someone in the tech space, I thought you might find value in \
                the discussions around innovation that my posts often generate."
            .to_string();
    }
    if title.contains("manager") || title.contains("director") || title.contains("vp") {
        return "I appreciate leaders taking time to engage with professional \
                content, and I'd value your perspective on the topics I share."
            .to_string();
    }
    if title.contains("founder") || title.contains("ceo") || title.contains("entrepreneur") {
        return "I have great respect for fellow founders, and I'd love to hear \
                about your journey and current ventures."
            .to_string();
    }
    if let Some(company) = record.company.as_deref() {
        return format!(
            "Your work at {company} caught my attention, and I'd be interested \
             to learn more about what you're building there."
        );
    }
    "I appreciate professionals who take time to engage with thoughtful \
     content, and I'd value the opportunity to connect."
        .to_string()
}

/// Relationship line keyed off connection degree.
fn connection_line(degree: ConnectionDegree) -> &'static str {
    match degree {
        ConnectionDegree::First => {
            "Since we're already connected on LinkedIn, I thought it would be \
             great to take our professional relationship beyond the platform."
        }
        ConnectionDegree::Second => {
            "I see we have mutual connections on LinkedIn, which suggests we \
             likely move in similar professional circles."
        }
        _ => {
            "While we may not be directly connected yet, your engagement with \
             my content suggests we share common professional interests."
        }
    }
}
