use axum::body::to_bytes;
use axum::body::Body;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use chrono::Local;

/// Human readable body size: `512 B`, `3.4 KB`, `1.2 MB`.
fn format_size(bytes: usize) -> String {
    const KB: f64 = 1024.0;
    let size = bytes as f64;
    if size < KB {
        format!("{} B", bytes)
    } else if size < KB * KB {
        format!("{:.1} KB", size / KB)
    } else {
        format!("{:.1} MB", size / (KB * KB))
    }
}

/// Middleware logging every HTTP request to the console:
/// local time, duration, response size, status, method and path.
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();

    let response = next.run(req).await;
    let (parts, body) = response.into_parts();

    // Buffer the body to learn its real size
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!("{} {} failed to buffer response: {}", method, uri.path(), e);
            println!(
                "\x1b[33m{}\x1b[0m | {:>5}ms | {:>10} | {} {:>6} {}",
                Local::now().format("%H:%M:%S"),
                start.elapsed().as_millis(),
                "error",
                parts.status.as_u16(),
                method,
                uri.path()
            );
            return Response::from_parts(parts, Body::default());
        }
    };

    let duration = start.elapsed();
    // cyan for success, yellow otherwise
    let color_code = if parts.status.is_success() { "36" } else { "33" };

    println!(
        "\x1b[{}m{}\x1b[0m | {:>5}ms | {:>10} | {} {:>6} {}",
        color_code,
        Local::now().format("%H:%M:%S"),
        duration.as_millis(),
        format_size(bytes.len()),
        parts.status.as_u16(),
        method,
        uri.path()
    );
    tracing::debug!(
        status = parts.status.as_u16(),
        elapsed_ms = duration.as_millis() as u64,
        "{} {}",
        method,
        uri.path()
    );

    Response::from_parts(parts, Body::from(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024 / 2), "1.5 MB");
    }
}
