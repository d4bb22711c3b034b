pub type PortfolioResult<T> = Result<T, PortfolioError>;

#[derive(thiserror::Error, Debug)]
pub enum PortfolioError {
    #[error("fetch error: {0}")]
    Fetch(String),

    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("image load failed: {0}")]
    ImageLoad(String),

    #[error("missing element: {0}")]
    MissingElement(String),

    #[error("webgl error: {0}")]
    Gl(String),

    #[error("js error: {0}")]
    Js(String),
}

impl PortfolioError {
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    pub fn image_load(url: impl Into<String>) -> Self {
        Self::ImageLoad(url.into())
    }

    pub fn missing(selector: impl Into<String>) -> Self {
        Self::MissingElement(selector.into())
    }

    pub fn gl(msg: impl Into<String>) -> Self {
        Self::Gl(msg.into())
    }
}

impl From<wasm_bindgen::JsValue> for PortfolioError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        Self::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<PortfolioError> for wasm_bindgen::JsValue {
    fn from(err: PortfolioError) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}

impl From<gloo_net::Error> for PortfolioError {
    fn from(err: gloo_net::Error) -> Self {
        match err {
            gloo_net::Error::SerdeError(e) => Self::Decode(e),
            other => Self::Fetch(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(PortfolioError::fetch("x").to_string().contains("fetch error:"));
        assert!(PortfolioError::image_load("a.jpg")
            .to_string()
            .contains("image load failed: a.jpg"));
        assert!(PortfolioError::missing("#bio-text")
            .to_string()
            .contains("missing element: #bio-text"));
        assert!(PortfolioError::gl("x").to_string().contains("webgl error:"));
    }

    #[test]
    fn decode_preserves_source() {
        let base = serde_json::from_str::<u32>("not json").unwrap_err();
        let err = PortfolioError::from(base);
        assert!(err.to_string().starts_with("decode error:"));
    }
}
