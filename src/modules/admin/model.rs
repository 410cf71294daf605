pub use norma_models::{
    CreateLegalUpdateRequest, CreateUserRequest, LegalUpdateResponse, MessageResponse,
    UpdateLegalUpdateRequest, UpdateUserRequest, UserResponse, UsersListResponse,
};

pub const INVALID_ROLE: &str = "Invalid role";
pub const CANNOT_DELETE_SELF: &str = "You cannot delete your own account";
