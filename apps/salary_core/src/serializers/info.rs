use serde::Serialize;

#[derive(Serialize)]
pub struct ApiInfo {
    pub message: &'static str,
    pub version: &'static str,
    pub description: &'static str,
}

#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub model_loaded: bool,
}
