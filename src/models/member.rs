use serde::Serialize;
use serde_json::Value;
use sqlx::FromRow;

use super::validation::{validate_email, validate_phone, PayloadReader, Rule, ValidationErrors};

pub const NAME_MAX_LEN: usize = 255;
pub const EMAIL_MAX_LEN: usize = 320;
pub const PHONE_MAX_LEN: usize = 15;

const MEMBER_FIELDS: &[&str] = &["name", "age", "email", "phone"];

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Member {
    pub id: i32,
    pub name: String,
    pub age: i32,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewMember {
    pub name: String,
    pub age: i32,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Full replacement of a member's mutable fields.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberUpdate {
    pub name: String,
    pub age: i32,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl NewMember {
    pub fn from_json(body: &Value) -> Result<Self, ValidationErrors> {
        let (name, age, email, phone) = read_member(body, Rule::Optional)?;
        Ok(Self { name, age, email, phone })
    }

    pub fn into_member(self, id: i32) -> Member {
        Member {
            id,
            name: self.name,
            age: self.age,
            email: self.email,
            phone: self.phone,
        }
    }
}

impl MemberUpdate {
    /// All four fields must be present; `email` and `phone` may be null.
    pub fn from_json(body: &Value) -> Result<Self, ValidationErrors> {
        let (name, age, email, phone) = read_member(body, Rule::RequiredNullable)?;
        Ok(Self { name, age, email, phone })
    }

    pub fn apply_to(self, member: &mut Member) {
        member.name = self.name;
        member.age = self.age;
        member.email = self.email;
        member.phone = self.phone;
    }
}

type MemberFields = (String, i32, Option<String>, Option<String>);

fn read_member(body: &Value, contact_rule: Rule) -> Result<MemberFields, ValidationErrors> {
    let mut reader = PayloadReader::new(body, MEMBER_FIELDS)?;

    let name = reader.string("name", Rule::Required, NAME_MAX_LEN);
    let age = reader.integer("age", Rule::Required);
    let email = reader.string("email", contact_rule, EMAIL_MAX_LEN);
    let phone = reader.string("phone", contact_rule, PHONE_MAX_LEN);

    if name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        reader.reject("name", "Shorter than minimum length 1.");
    }
    if age.is_some_and(|a| a < 0) {
        reader.reject("age", "Must be greater than or equal to 0.");
    }
    if let Some(Err(message)) = email.as_deref().map(validate_email) {
        reader.reject("email", message);
    }
    if let Some(Err(message)) = phone.as_deref().map(validate_phone) {
        reader.reject("phone", message);
    }

    reader.finish()?;

    match (name, age) {
        (Some(name), Some(age)) => Ok((name, age, email, phone)),
        _ => Err(ValidationErrors::schema("Invalid member payload.")),
    }
}
