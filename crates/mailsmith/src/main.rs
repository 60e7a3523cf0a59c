//! `mailsmith` - Encode and send structured email messages
//!
//! Reads a JSON message file and either prints the RFC 5322 encoding or
//! delivers it over SMTP or an HTTP mail API.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod config;
mod draft;

use anyhow::{Context, Result, bail};
use mailsmith_api::RawMessage;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;
use draft::Draft;

const USAGE: &str = "usage: mailsmith <encode|raw|send-smtp|send-api> <message.json>";

/// What to do with the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Print the encoded message.
    Encode,
    /// Print the base64url raw-message form.
    Raw,
    /// Deliver over SMTP.
    SendSmtp,
    /// Deliver through the HTTP mail API.
    SendApi,
}

impl Command {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "encode" => Some(Self::Encode),
            "raw" => Some(Self::Raw),
            "send-smtp" => Some(Self::SendSmtp),
            "send-api" => Some(Self::SendApi),
            _ => None,
        }
    }
}

/// Parses `<command> <message.json>`.
fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<(Command, PathBuf)> {
    let mut args = args.into_iter();
    let (Some(name), Some(path), None) = (args.next(), args.next(), args.next()) else {
        bail!(USAGE);
    };
    let Some(command) = Command::parse(&name) else {
        bail!("unknown command {name:?}\n{USAGE}");
    };
    Ok((command, PathBuf::from(path)))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr, stdout carries the encoded message
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "mailsmith=info,mailsmith_smtp=info,mailsmith_api=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let (command, path) = parse_args(std::env::args().skip(1))?;
    let message = Draft::load(&path).await?.into_message();

    match command {
        Command::Encode => {
            let bytes = message.to_bytes().context("failed to encode message")?;
            write_stdout(&bytes)?;
        }
        Command::Raw => {
            let raw = RawMessage::encode(&message).context("failed to encode message")?;
            write_stdout(format!("{}\n", raw.raw).as_bytes())?;
        }
        Command::SendSmtp => {
            let config = Config::load().await?;
            let smtp = config.smtp()?;
            info!(
                "Sending via {}:{} ({})",
                smtp.host,
                smtp.effective_port(),
                smtp.security.display_name()
            );
            mailsmith_smtp::send_message(smtp, &message)
                .await
                .context("SMTP delivery failed")?;
        }
        Command::SendApi => {
            let config = Config::load().await?;
            let client = config.api()?.client()?;
            info!("Sending via {}", client.endpoint());
            let sent = client
                .send(&message)
                .await
                .context("API delivery failed")?;
            write_stdout(format!("{}\n", sent.id).as_bytes())?;
        }
    }

    Ok(())
}

fn write_stdout(bytes: &[u8]) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(bytes)?;
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_parse_args() {
        let (command, path) = parse_args(args(&["send-smtp", "m.json"])).unwrap();
        assert_eq!(command, Command::SendSmtp);
        assert_eq!(path, PathBuf::from("m.json"));

        assert_eq!(parse_args(args(&["raw", "x"])).unwrap().0, Command::Raw);
        assert_eq!(parse_args(args(&["encode", "x"])).unwrap().0, Command::Encode);
        assert_eq!(parse_args(args(&["send-api", "x"])).unwrap().0, Command::SendApi);
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(parse_args(args(&[])).is_err());
        assert!(parse_args(args(&["encode"])).is_err());
        assert!(parse_args(args(&["encode", "a", "b"])).is_err());

        let err = parse_args(args(&["print", "a"])).unwrap_err();
        assert!(err.to_string().starts_with("unknown command \"print\""));
    }
}
