//! Task routing: pick the specialist destination for an inbound message
//!
//! One low-token classification round-trip per message. Classification is
//! best-effort: a backend failure or an answer outside the destination
//! vocabulary resolves to [`Destination::General`] and never fails the
//! request.

pub mod table;

pub use table::DestinationTable;

use crate::agent::{ClassificationBackend, Destination};
use std::sync::Arc;

/// Classifies messages into a [`Destination`].
#[derive(Clone)]
pub struct TaskRouter {
    backend: Arc<dyn ClassificationBackend>,
    table: Arc<DestinationTable>,
    /// System turn sent with every classification, built once from the table
    instructions: String,
}

impl TaskRouter {
    pub fn new(backend: Arc<dyn ClassificationBackend>, table: Arc<DestinationTable>) -> Self {
        let instructions = build_instructions(&table);
        Self {
            backend,
            table,
            instructions,
        }
    }

    pub fn table(&self) -> &DestinationTable {
        &self.table
    }

    /// Choose a destination for `message`.
    ///
    /// Always returns; errors degrade to [`Destination::General`].
    pub async fn classify(&self, message: &str) -> Destination {
        let reply = match self
            .backend
            .classify_completion(&self.instructions, message)
            .await
        {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    category = %crate::agent::classify(&e),
                    "Classification failed, routing to general"
                );
                return Destination::General;
            }
        };

        match parse_destination(&reply, &self.table) {
            Some(destination) => {
                tracing::debug!(destination = %destination, "Message classified");
                destination
            }
            None => {
                tracing::warn!(
                    reply = %reply.chars().take(64).collect::<String>(),
                    "Classifier answered outside the destination vocabulary, routing to general"
                );
                Destination::General
            }
        }
    }
}

/// Normalize a classifier reply and look it up in `table`.
///
/// The reply is lower-cased and stripped to `[a-z-]`, so `" Coder.\n"` and
/// `"**coder**"` both resolve to [`Destination::Coder`].
pub fn parse_destination(reply: &str, table: &DestinationTable) -> Option<Destination> {
    let normalized: String = reply
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || *c == '-')
        .collect();
    let destination = normalized.trim_matches('-').parse::<Destination>().ok()?;
    table.contains(destination).then_some(destination)
}

/// Classifier instructions enumerating the destination vocabulary.
pub fn build_instructions(table: &DestinationTable) -> String {
    let mut out = String::from(
        "You route chat messages to a specialist. Reply with exactly one destination \
         name from the list below and nothing else.\n\nDestinations:\n",
    );
    for (destination, profile) in table.iter() {
        out.push_str(&format!("- {}: {}\n", destination, profile.description));
    }
    out.push_str(&format!(
        "\nChoose the single best destination. When the message is ambiguous, reply {}.",
        Destination::General
    ));
    out
}
