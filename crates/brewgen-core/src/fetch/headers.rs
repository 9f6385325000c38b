//! Response header tracking across a redirect chain.

/// Collects `Content-Length` of the last response in a redirect chain.
///
/// libcurl hands every header line of every hop to the header callback, so a
/// status line resets what was seen for the previous hop.
#[derive(Debug, Default)]
pub(crate) struct FinalHeaders {
    content_length: Option<u64>,
}

impl FinalHeaders {
    pub(crate) fn feed(&mut self, raw: &[u8]) {
        let Ok(line) = std::str::from_utf8(raw) else {
            return;
        };
        let line = line.trim();
        if line.starts_with("HTTP/") {
            self.content_length = None;
            return;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                self.content_length = value.trim().parse::<u64>().ok();
            }
        }
    }

    pub(crate) fn content_length(&self) -> Option<u64> {
        self.content_length
    }
}
