//! Dummy smtp server that accepts every message and only logs it. Useful to
//! exercise the delivery path locally without a real mail account: point
//! `email.smtp_host`/`email.smtp_port` at `gcode_testing smtp` and set
//! `email.secure = false`.

use std::net::IpAddr;

use anyhow::Context;
use tokio::{
    io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader},
    net::TcpListener,
};
use tracing::{error, info};

pub async fn start_server(host: IpAddr, port: u16) -> anyhow::Result<()> {
    let listener = TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind {host}:{port}"))?;
    info!("smtp sink listening on {host}:{port}");

    loop {
        let (stream, addr) = listener.accept().await?;
        tokio::spawn(async move {
            match handle_session(stream).await {
                Ok(mails) => {
                    for mail in mails {
                        info!(
                            "received mail from {} to {:?}:\n{}",
                            mail.from, mail.recipients, mail.data
                        );
                    }
                }
                Err(err) => error!("session with {addr} failed: {err:#}"),
            }
        });
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ReceivedMail {
    from: String,
    recipients: Vec<String>,
    data: String,
}

async fn handle_session<S: AsyncRead + AsyncWrite + Unpin>(
    stream: S,
) -> anyhow::Result<Vec<ReceivedMail>> {
    let (reader, mut writer) = tokio::io::split(stream);
    let mut reader = BufReader::new(reader);

    writer.write_all(b"220 gcode-testing smtp sink\r\n").await?;

    let mut mails = Vec::new();
    let mut from = String::new();
    let mut recipients = Vec::new();
    let mut line = String::new();

    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            return Ok(mails);
        }
        let command = line.trim_end().to_owned();

        if strip_prefix_ignore_case(&command, "HELO").is_some()
            || strip_prefix_ignore_case(&command, "EHLO").is_some()
        {
            writer.write_all(b"250 gcode-testing\r\n").await?;
        } else if let Some(sender) = strip_prefix_ignore_case(&command, "MAIL FROM:") {
            from = trim_address(sender);
            writer.write_all(b"250 OK\r\n").await?;
        } else if let Some(recipient) = strip_prefix_ignore_case(&command, "RCPT TO:") {
            recipients.push(trim_address(recipient));
            writer.write_all(b"250 OK\r\n").await?;
        } else if strip_prefix_ignore_case(&command, "DATA").is_some() {
            writer
                .write_all(b"354 End data with <CR><LF>.<CR><LF>\r\n")
                .await?;

            let mut data = String::new();
            loop {
                line.clear();
                if reader.read_line(&mut line).await? == 0 {
                    anyhow::bail!("connection closed during DATA");
                }
                if line.trim_end() == "." {
                    break;
                }
                data.push_str(line.strip_prefix('.').unwrap_or(&line));
            }

            mails.push(ReceivedMail {
                from: std::mem::take(&mut from),
                recipients: std::mem::take(&mut recipients),
                data,
            });
            writer.write_all(b"250 OK\r\n").await?;
        } else if strip_prefix_ignore_case(&command, "QUIT").is_some() {
            writer.write_all(b"221 Bye\r\n").await?;
            return Ok(mails);
        } else if strip_prefix_ignore_case(&command, "RSET").is_some() {
            from.clear();
            recipients.clear();
            writer.write_all(b"250 OK\r\n").await?;
        } else if strip_prefix_ignore_case(&command, "NOOP").is_some() {
            writer.write_all(b"250 OK\r\n").await?;
        } else {
            writer.write_all(b"502 Command not implemented\r\n").await?;
        }
    }
}

fn strip_prefix_ignore_case<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    let head = line.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &line[prefix.len()..])
}

fn trim_address(raw: &str) -> String {
    raw.trim()
        .trim_start_matches('<')
        .trim_end_matches('>')
        .to_owned()
}
