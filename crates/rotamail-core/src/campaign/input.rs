//! Campaign input parsing boundary
//!
//! Turns the free-text form fields (recipient list, header lines) into
//! the typed pieces of a [`CampaignRequest`](super::CampaignRequest).
//! Invalid addresses are dropped here; the dispatch core assumes every
//! recipient it sees is valid.

use super::Recipient;
use lettre::Address;
use tracing::debug;

/// Parse a recipient list, one entry per line.
///
/// Accepted forms: `email@domain.com` or `Name <email@domain.com>`.
/// Blank lines and entries with unparseable addresses are skipped.
pub fn parse_recipients(text: &str) -> Vec<Recipient> {
    text.lines()
        .filter_map(|line| {
            let line = line.trim();
            if line.is_empty() {
                return None;
            }

            let (name, email) = split_mailbox(line);
            if email.parse::<Address>().is_err() {
                debug!(entry = line, "Skipping recipient with invalid address");
                return None;
            }

            Some(Recipient {
                email: email.to_string(),
                name: name.map(str::to_string),
            })
        })
        .collect()
}

/// Parse raw header lines, one per line, blanks skipped
pub fn parse_headers(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split `Name <email>` into its parts; anything else is a bare address
fn split_mailbox(line: &str) -> (Option<&str>, &str) {
    if let Some(rest) = line.strip_suffix('>') {
        if let Some(open) = rest.rfind('<') {
            let name = rest[..open].trim();
            let email = rest[open + 1..].trim();
            let name = (!name.is_empty()).then_some(name);
            return (name, email);
        }
    }
    (None, line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_bare_and_named_recipients() {
        let parsed = parse_recipients("one@example.com\nJane Doe <two@example.com>\n");

        assert_eq!(
            parsed,
            vec![
                Recipient {
                    email: "one@example.com".to_string(),
                    name: None,
                },
                Recipient {
                    email: "two@example.com".to_string(),
                    name: Some("Jane Doe".to_string()),
                },
            ]
        );
    }

    #[test]
    fn test_parse_drops_invalid_and_blank_lines() {
        let parsed = parse_recipients("\n  \nnot-an-address\nBroken <also not one>\nok@example.com");

        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].email, "ok@example.com");
    }

    #[test]
    fn test_parse_angle_brackets_without_name() {
        let parsed = parse_recipients("<solo@example.com>");

        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].email, "solo@example.com");
        assert_eq!(parsed[0].name, None);
    }

    #[test]
    fn test_parse_headers_skips_blanks() {
        let parsed = parse_headers("Reply-To: you@example.com\n\n  X-Campaign: August  \n");

        assert_eq!(
            parsed,
            vec![
                "Reply-To: you@example.com".to_string(),
                "X-Campaign: August".to_string(),
            ]
        );
    }
}
