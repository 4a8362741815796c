//! The prompt / command / verify exchange on an open shell.

use log::{debug, info};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::time::Instant;

use super::request::CertificateRequest;
use super::response::Response;
use crate::channel::PromptWaiter;
use crate::error::{ChannelError, DriverError, Result};

/// Command that ends the CLI session.
pub const EXIT_COMMAND: &str = "exit";

/// Run one certificate generation over an already open shell.
///
/// Waits for the login prompt, sends the generate command, waits for the
/// prompt again and sends `exit` without waiting for it to take effect.
/// The run fails with [`DriverError::CertificateGeneration`] when the
/// command output lacks the success token.
pub async fn run_certificate_request<S>(
    shell: &mut S,
    request: &CertificateRequest,
    waiter: &PromptWaiter,
) -> Result<Response>
where
    S: AsyncRead + AsyncWrite + Unpin + ?Sized,
{
    let start = Instant::now();

    let banner = waiter.wait(shell).await?;
    debug!("initial prompt received ({} bytes)", banner.len());

    let command = request.command_line();
    info!("generating certificate {}", request);
    send_line(shell, &command).await?;

    let output = waiter.wait(shell).await?;
    debug!("command completed ({} bytes)", output.len());

    // Fire and forget
    send_line(shell, EXIT_COMMAND).await?;

    let response = Response::new(command, banner, output, start.elapsed());
    if !response.is_success() {
        return Err(DriverError::CertificateGeneration {
            transcript: response.transcript(),
        }
        .into());
    }

    info!(
        "certificate '{}' generated in {:?}",
        request.friendly_name, response.elapsed
    );
    Ok(response)
}

/// Type a line into the shell.
async fn send_line<S>(shell: &mut S, line: &str) -> Result<()>
where
    S: AsyncWrite + Unpin + ?Sized,
{
    let mut data = Vec::with_capacity(line.len() + 1);
    data.extend_from_slice(line.as_bytes());
    data.push(b'\n');

    shell.write_all(&data).await.map_err(ChannelError::Io)?;
    shell.flush().await.map_err(ChannelError::Io)?;
    Ok(())
}
