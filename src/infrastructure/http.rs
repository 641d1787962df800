use bytes::Bytes;
use http_body_util::{BodyExt, Empty};
use hyper::client::conn::http2;
use hyper_util::rt::{TokioExecutor, TokioIo};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::domain::ProbeError;
use crate::ports::{BoxedIoStream, HttpClient, HttpResponse};

const HEADER_LIMIT: usize = 32 * 1024;

/// Speaks HTTP/1.1 by hand over whatever stream it is given, and defers to
/// hyper for the h2 framing when ALPN picked that.
pub struct HybridHttpClient;

impl HybridHttpClient {
    pub fn new() -> Self {
        Self
    }
}

impl HttpClient for HybridHttpClient {
    async fn request_h1(
        &self,
        mut stream: BoxedIoStream,
        method: &str,
        path: &str,
        headers: &[(String, String)],
        body_limit: usize,
    ) -> Result<HttpResponse, ProbeError> {
        let mut request = format!("{} {} HTTP/1.1\r\n", method, path);
        for (name, value) in headers {
            request.push_str(name);
            request.push_str(": ");
            request.push_str(value);
            request.push_str("\r\n");
        }
        request.push_str("Connection: close\r\n\r\n");

        stream
            .write_all(request.as_bytes())
            .await
            .map_err(|e| ProbeError::http(format!("failed to send request: {}", e)))?;

        let mut buffer = vec![0u8; HEADER_LIMIT + body_limit];
        let mut total_read = 0;
        loop {
            let n = stream
                .read(&mut buffer[total_read..])
                .await
                .map_err(|e| ProbeError::http(format!("failed to read response: {}", e)))?;
            if n == 0 {
                break;
            }
            total_read += n;

            if let Some(pos) = find_header_end(&buffer[..total_read]) {
                let body_so_far = total_read.saturating_sub(pos + 4);
                if body_so_far >= body_limit {
                    break;
                }
            }
            if total_read >= buffer.len() {
                break;
            }
        }
        buffer.truncate(total_read);

        let (status, reason, version, resp_headers, body_start) =
            parse_response_with_1xx_skip(&buffer)?;

        let body = if body_start < buffer.len() {
            let raw = &buffer[body_start..];
            if header_value(&resp_headers, "transfer-encoding")
                .map(|t| t.to_ascii_lowercase().contains("chunked"))
                .unwrap_or(false)
            {
                decode_chunked(raw, body_limit)
            } else {
                raw[..raw.len().min(body_limit)].to_vec()
            }
        } else {
            Vec::new()
        };

        Ok(HttpResponse { status, reason, version, headers: resp_headers, body })
    }

    async fn request_h2(
        &self,
        stream: BoxedIoStream,
        method: &str,
        url: &str,
        headers: &[(String, String)],
        body_limit: usize,
    ) -> Result<HttpResponse, ProbeError> {
        let io = TokioIo::new(stream);
        let (mut sender, conn) = http2::handshake(TokioExecutor::new(), io)
            .await
            .map_err(|e| ProbeError::http(format!("h2 handshake failed: {}", e)))?;

        tokio::spawn(async move {
            let _ = conn.await;
        });

        let mut builder = hyper::Request::builder().method(method).uri(url);
        for (name, value) in headers {
            // connection-scoped headers have no place in h2
            if name.eq_ignore_ascii_case("connection") {
                continue;
            }
            builder = builder.header(name.as_str(), value.as_str());
        }
        let request = builder
            .body(Empty::<Bytes>::new())
            .map_err(|e| ProbeError::http(format!("failed to build request: {}", e)))?;

        let response = sender
            .send_request(request)
            .await
            .map_err(|e| ProbeError::http(format!("h2 request failed: {}", e)))?;

        let status = response.status().as_u16();
        let reason = response.status().canonical_reason().map(|s| s.to_string());
        let resp_headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.as_str().to_string(), String::from_utf8_lossy(v.as_bytes()).to_string()))
            .collect();

        let mut body = Vec::new();
        let mut frames = response.into_body();
        while body.len() < body_limit {
            match frames.frame().await {
                Some(Ok(frame)) => {
                    if let Some(chunk) = frame.data_ref() {
                        let remaining = body_limit - body.len();
                        let take = chunk.len().min(remaining);
                        body.extend_from_slice(&chunk[..take]);
                    }
                }
                Some(Err(e)) => {
                    return Err(ProbeError::http(format!("failed to read h2 body: {}", e)))
                }
                None => break,
            }
        }

        Ok(HttpResponse { status, reason, version: "h2".to_string(), headers: resp_headers, body })
    }
}

fn header_value<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

fn find_header_end(data: &[u8]) -> Option<usize> {
    data.windows(4).position(|w| w == b"\r\n\r\n")
}

type ParsedResponse = (u16, Option<String>, String, Vec<(String, String)>, usize);

fn parse_response_with_1xx_skip(data: &[u8]) -> Result<ParsedResponse, ProbeError> {
    let mut offset = 0;
    loop {
        let remaining = &data[offset..];
        let headers_end =
            find_header_end(remaining).ok_or_else(|| ProbeError::http("incomplete HTTP response"))?;
        let (status, reason, version, headers) = parse_head(&remaining[..headers_end])?;

        // interim responses precede the real one
        if (100..200).contains(&status) {
            offset += headers_end + 4;
            continue;
        }

        return Ok((status, reason, version, headers, offset + headers_end + 4));
    }
}

fn parse_head(
    head: &[u8],
) -> Result<(u16, Option<String>, String, Vec<(String, String)>), ProbeError> {
    let mut lines = head.split(|&b| b == b'\n');

    let status_line = lines.next().ok_or_else(|| ProbeError::http("missing status line"))?;
    let status_line = std::str::from_utf8(status_line)
        .map_err(|_| ProbeError::http("invalid status line encoding"))?
        .trim_end_matches('\r');

    let parts: Vec<&str> = status_line.splitn(3, ' ').collect();
    if parts.len() < 2 {
        return Err(ProbeError::http(format!("invalid status line: {}", status_line)));
    }

    let version = if parts[0].contains("1.0") {
        "http/1.0"
    } else {
        "http/1.1"
    }
    .to_string();

    let status: u16 = parts[1]
        .parse()
        .map_err(|_| ProbeError::http(format!("invalid status code: {}", parts[1])))?;
    let reason = parts.get(2).map(|s| s.trim().to_string()).filter(|s| !s.is_empty());

    let mut headers = Vec::new();
    for line in lines {
        let line = std::str::from_utf8(line).unwrap_or("").trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.push((name.trim().to_string(), value.trim().to_string()));
        }
    }

    Ok((status, reason, version, headers))
}

fn decode_chunked(data: &[u8], limit: usize) -> Vec<u8> {
    let mut result = Vec::new();
    let mut pos = 0;

    while pos < data.len() && result.len() < limit {
        let line_end = match data[pos..].iter().position(|&b| b == b'\n') {
            Some(p) => pos + p,
            None => break,
        };

        let size_line = std::str::from_utf8(&data[pos..line_end]).unwrap_or("").trim_end_matches('\r');
        let size_str = size_line.split(';').next().unwrap_or("");
        let chunk_size = match usize::from_str_radix(size_str.trim(), 16) {
            Ok(0) | Err(_) => break,
            Ok(n) => n,
        };

        pos = line_end + 1;
        let chunk_end = (pos + chunk_size).min(data.len());
        let take = (limit - result.len()).min(chunk_end - pos);
        result.extend_from_slice(&data[pos..pos + take]);

        // skip the CRLF trailing each chunk
        pos = chunk_end + 2;
    }

    result
}
