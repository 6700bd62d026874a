#[derive(Debug, Clone)]
pub struct CreateUserDto {
    pub name: String,
    pub email: String,
    pub contact_number: String,
    pub password: String,
    pub terms_accepted: bool,
}
