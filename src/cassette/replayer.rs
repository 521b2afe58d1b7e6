//! Serves recorded interactions back out of a cassette.

use std::collections::{HashMap, VecDeque};

use thiserror::Error;

use super::format::{Cassette, Interaction};

/// A replay request the cassette cannot answer.
#[derive(Debug, Error, PartialEq)]
pub enum ReplayError {
    /// Nothing was ever recorded for this `port::method`.
    #[error(
        "Cassette exhausted: no interactions recorded for {port}::{method} \
         (recorded: [{recorded}])"
    )]
    NotRecorded {
        /// Port that was asked.
        port: String,
        /// Method that was asked.
        method: String,
        /// Comma-separated `port::method` pairs the cassette does hold.
        recorded: String,
    },
    /// Every recorded interaction for this `port::method` was already served.
    #[error("Cassette exhausted: all {served} interactions for {port}::{method} were consumed")]
    Consumed {
        /// Port that was asked.
        port: String,
        /// Method that was asked.
        method: String,
        /// How many interactions this stream held.
        served: usize,
    },
}

#[derive(Default)]
struct Stream {
    pending: VecDeque<Interaction>,
    served: usize,
}

/// Hands out a cassette's interactions in recorded order, one stream per
/// `port::method`.
pub struct CassetteReplayer {
    streams: HashMap<(String, String), Stream>,
}

impl CassetteReplayer {
    /// Split `cassette` into per-`port::method` streams.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut streams: HashMap<(String, String), Stream> = HashMap::new();
        for interaction in &cassette.interactions {
            streams
                .entry((interaction.port.clone(), interaction.method.clone()))
                .or_default()
                .pending
                .push_back(interaction.clone());
        }
        Self { streams }
    }

    /// Take the next interaction recorded for `port::method`.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError`] when the stream was never recorded or has
    /// run dry.
    pub fn next_interaction(
        &mut self,
        port: &str,
        method: &str,
    ) -> Result<Interaction, ReplayError> {
        let Some(stream) = self.streams.get_mut(&(port.to_string(), method.to_string())) else {
            let mut recorded: Vec<String> =
                self.streams.keys().map(|(p, m)| format!("{p}::{m}")).collect();
            recorded.sort();
            return Err(ReplayError::NotRecorded {
                port: port.to_string(),
                method: method.to_string(),
                recorded: recorded.join(", "),
            });
        };

        let interaction = stream.pending.pop_front().ok_or_else(|| ReplayError::Consumed {
            port: port.to_string(),
            method: method.to_string(),
            served: stream.served,
        })?;
        stream.served += 1;
        Ok(interaction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn completion(seq: u64, method: &str, text: &str) -> Interaction {
        Interaction {
            seq,
            port: "llm".into(),
            method: method.into(),
            input: json!({"model": "gpt-4o"}),
            output: json!({"Ok": {"text": text}}),
        }
    }

    fn make_cassette(interactions: Vec<Interaction>) -> Cassette {
        Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            commit: "abc".into(),
            interactions,
        }
    }

    #[test]
    fn serves_each_method_stream_in_order() {
        let cassette = make_cassette(vec![
            completion(0, "complete", "one"),
            completion(1, "other", "interleaved"),
            completion(2, "complete", "two"),
        ]);
        let mut replayer = CassetteReplayer::new(&cassette);

        assert_eq!(replayer.next_interaction("llm", "complete").unwrap().seq, 0);
        assert_eq!(replayer.next_interaction("llm", "complete").unwrap().seq, 2);
        assert_eq!(replayer.next_interaction("llm", "other").unwrap().seq, 1);
    }

    #[test]
    fn consumed_stream_is_an_error() {
        let cassette = make_cassette(vec![completion(0, "complete", "only")]);
        let mut replayer = CassetteReplayer::new(&cassette);
        replayer.next_interaction("llm", "complete").unwrap();

        let err = replayer.next_interaction("llm", "complete").unwrap_err();
        assert_eq!(
            err,
            ReplayError::Consumed { port: "llm".into(), method: "complete".into(), served: 1 }
        );
        assert!(err.to_string().starts_with("Cassette exhausted"));
    }

    #[test]
    fn empty_cassette_reports_nothing_recorded() {
        let mut replayer = CassetteReplayer::new(&make_cassette(vec![]));
        let err = replayer.next_interaction("llm", "complete").unwrap_err();
        assert!(matches!(err, ReplayError::NotRecorded { .. }));
        assert!(err.to_string().contains("no interactions recorded for llm::complete"));
    }

    #[test]
    fn unknown_method_lists_recorded_streams() {
        let cassette = make_cassette(vec![completion(0, "complete", "x")]);
        let mut replayer = CassetteReplayer::new(&cassette);
        let err = replayer.next_interaction("llm", "stream").unwrap_err();
        assert!(err.to_string().contains("[llm::complete]"));
    }
}
