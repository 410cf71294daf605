pub use norma_models::{UpdateProfileRequest, UserResponse};
