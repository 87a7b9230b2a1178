// Deep-link bootstrap payload.
// Single-use slot carrying a weather payload delivered through the weatherData cookie.

/// Cookie name the server uses for deep-link payloads.
pub const BOOTSTRAP_COOKIE: &str = "weatherData";

/// Holds a pre-selected weather payload until it is read once.
#[derive(Debug, Clone, Default)]
pub struct BootstrapSlot {
    payload: Option<String>,
}

impl BootstrapSlot {
    /// An empty slot.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A slot holding a raw JSON payload. Blank payloads count as empty.
    pub fn with_payload(payload: impl Into<String>) -> Self {
        let payload = payload.into();
        Self {
            payload: (!payload.trim().is_empty()).then_some(payload),
        }
    }

    /// Extract the payload from a `Set-Cookie` or `Cookie` header value.
    pub fn from_cookie_header(header: &str) -> Self {
        let value = header
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| name.trim() == BOOTSTRAP_COOKIE)
            .map(|(_, value)| value.trim());

        match value.and_then(|v| urlencoding::decode(v).ok()) {
            Some(decoded) => Self::with_payload(decoded.into_owned()),
            None => Self::empty(),
        }
    }

    /// Read the payload and clear the slot.
    pub fn take(&mut self) -> Option<String> {
        self.payload.take()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_none()
    }
}

/// `Set-Cookie` header value carrying `payload`.
pub fn bootstrap_cookie(payload: &str) -> String {
    format!(
        "{}={}; Path=/; SameSite=Lax",
        BOOTSTRAP_COOKIE,
        urlencoding::encode(payload)
    )
}
