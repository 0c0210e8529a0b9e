/// Database row types. These map directly to SQLite rows and stay distinct
/// from the warbler-types models so the DB layer has no serde surface.

pub struct UserRow {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub image_url: String,
    pub header_image_url: String,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub created_at: String,
}

/// Message joined with its author's display fields.
pub struct MessageRow {
    pub id: String,
    pub text: String,
    pub created_at: String,
    pub user_id: String,
    pub author_username: String,
    pub author_image_url: String,
}

pub struct SessionRow {
    pub id: String,
    pub user_id: String,
    pub created_at: String,
    pub expires_at: String,
}

pub struct NewUser<'a> {
    pub id: &'a str,
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub image_url: Option<&'a str>,
}

/// Column updates for a profile edit. `None` leaves the column untouched.
#[derive(Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub image_url: Option<String>,
    pub header_image_url: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
}

pub struct UserCounts {
    pub following: u64,
    pub followers: u64,
    pub likes: u64,
}
