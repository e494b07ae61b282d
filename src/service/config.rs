use std::net::{AddrParseError, IpAddr, SocketAddr};

/// Which of the two services a process serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceKind {
    Analysis,
    Toolkit,
}

/// Metadata published in the OpenAPI document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiInfo {
    pub title: String,
    pub description: Option<String>,
    pub version: String,
}

impl ServiceKind {
    pub fn api_info(self) -> ApiInfo {
        match self {
            ServiceKind::Analysis => ApiInfo {
                title: "MathNotes CAS API".to_string(),
                description: Some("Provides symbolic math analysis for equations".to_string()),
                version: "1.0".to_string(),
            },
            ServiceKind::Toolkit => ApiInfo {
                title: "MathNotes Expression Toolkit".to_string(),
                description: None,
                version: "0.1.0".to_string(),
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub service: ServiceKind,
    pub info: ApiInfo,
}

impl ServerConfig {
    pub fn new(service: ServiceKind, host: &str, port: u16) -> Result<Self, AddrParseError> {
        let ip: IpAddr = host.parse()?;
        Ok(ServerConfig {
            addr: SocketAddr::new(ip, port),
            service,
            info: service.api_info(),
        })
    }
}
