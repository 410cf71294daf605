pub use norma_models::{AuthResponse, LoginRequest, MessageResponse, RegisterRequest};
