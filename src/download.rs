use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;

use crate::error::FetchError;
use crate::logging::StepLogger;
use crate::origin::OriginUrl;

/// Client with reqwest's stock settings: default timeouts and redirect policy,
/// no extra headers.
pub fn default_client() -> Result<Client, FetchError> {
    Client::builder().build().map_err(FetchError::Client)
}

/// Sends the GET and accepts nothing but `200 OK`.
pub fn request(
    client: &Client,
    origin: &OriginUrl,
    log: &StepLogger,
) -> Result<Response, FetchError> {
    log.step(format_args!("retrieving file from server: {}", origin));

    let response = client.get(origin.as_url().clone()).send().map_err(|e| {
        log.step(format_args!("an error occurred after get request: {}", e));
        FetchError::Request(e)
    })?;

    let status = response.status();
    if status != StatusCode::OK {
        log.step(format_args!(
            "status code expected to be 200 (ok) but was {}",
            status.as_u16()
        ));
        return Err(FetchError::Status(status));
    }

    Ok(response)
}

/// Creates or truncates `output_path` and streams `body` into it.
/// Returns the number of bytes written.
pub fn write_body<R: io::Read>(
    mut body: R,
    output_path: &Path,
    log: &StepLogger,
) -> Result<u64, FetchError> {
    log.step("creating the file locally");
    let file = fs::File::create(output_path).map_err(|source| {
        log.step(format_args!("the system couldn't create the file: {}", source));
        FetchError::CreateFile {
            path: output_path.to_path_buf(),
            source,
        }
    })?;

    log.step("writing the file");
    let mut writer = BufWriter::new(file);
    let written = io::copy(&mut body, &mut writer)
        .and_then(|n| writer.flush().map(|()| n))
        .map_err(|source| {
            log.step(format_args!("the system couldn't write the file: {}", source));
            FetchError::WriteFile {
                path: output_path.to_path_buf(),
                source,
            }
        })?;

    Ok(written)
}

/// Downloads `origin` into `output_path`. The destination file is only
/// touched once the server has answered `200 OK`.
pub fn download_file(
    client: &Client,
    origin: &OriginUrl,
    output_path: &Path,
    log: &StepLogger,
) -> Result<u64, FetchError> {
    let response = request(client, origin, log)?;
    write_body(response, output_path, log)
}
