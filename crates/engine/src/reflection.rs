use std::any::{type_name, Any};

use thiserror::Error;

pub trait Reflect {
    fn type_name(&self) -> &'static str;

    fn field_any(&self, name: &str) -> Option<&dyn Any>;

    fn field_any_mut(&mut self, name: &str) -> Option<&mut dyn Any>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("type '{owner}' has no field named '{field}'")]
    FieldNotFound { owner: &'static str, field: String },
    #[error("field '{owner}.{field}' is not of type {expected}")]
    TypeMismatch {
        owner: &'static str,
        field: String,
        expected: &'static str,
    },
}

#[derive(Debug)]
pub struct ReflectedField<'a, T> {
    value: &'a mut T,
}

impl<'a, T> ReflectedField<'a, T> {
    pub fn get(&self) -> &T {
        self.value
    }

    pub fn set(&mut self, value: T) {
        *self.value = value;
    }

    pub fn replace(&mut self, value: T) -> T {
        std::mem::replace(self.value, value)
    }

    pub fn into_mut(self) -> &'a mut T {
        self.value
    }
}

pub fn field_ref<'a, T: Any>(owner: &'a dyn Reflect, name: &str) -> Result<&'a T, FieldError> {
    let owner_name = owner.type_name();
    let raw = owner
        .field_any(name)
        .ok_or_else(|| FieldError::FieldNotFound {
            owner: owner_name,
            field: name.to_string(),
        })?;
    raw.downcast_ref::<T>()
        .ok_or_else(|| FieldError::TypeMismatch {
            owner: owner_name,
            field: name.to_string(),
            expected: type_name::<T>(),
        })
}

pub fn field_mut<'a, T: Any>(
    owner: &'a mut dyn Reflect,
    name: &str,
) -> Result<ReflectedField<'a, T>, FieldError> {
    let owner_name = owner.type_name();
    let raw = owner
        .field_any_mut(name)
        .ok_or_else(|| FieldError::FieldNotFound {
            owner: owner_name,
            field: name.to_string(),
        })?;
    let value = raw
        .downcast_mut::<T>()
        .ok_or_else(|| FieldError::TypeMismatch {
            owner: owner_name,
            field: name.to_string(),
            expected: type_name::<T>(),
        })?;
    Ok(ReflectedField { value })
}

pub fn check_field<T: Any>(owner: &dyn Reflect, name: &str) -> Result<(), FieldError> {
    field_ref::<T>(owner, name).map(|_| ())
}

#[macro_export]
macro_rules! reflect_fields {
    ($ty:ty as $owner:literal { $($field:literal => $member:ident),* $(,)? }) => {
        impl $crate::Reflect for $ty {
            fn type_name(&self) -> &'static str {
                $owner
            }

            fn field_any(&self, name: &str) -> Option<&dyn ::std::any::Any> {
                match name {
                    $($field => Some(&self.$member),)*
                    _ => None,
                }
            }

            fn field_any_mut(&mut self, name: &str) -> Option<&mut dyn ::std::any::Any> {
                match name {
                    $($field => Some(&mut self.$member),)*
                    _ => None,
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Statics {
        texture: String,
        count: u32,
    }

    crate::reflect_fields!(Statics as "Statics" {
        "texture" => texture,
        "count" => count,
    });

    fn statics() -> Statics {
        Statics {
            texture: "old".to_string(),
            count: 3,
        }
    }

    #[test]
    fn reads_and_writes_named_field() {
        let mut owner = statics();
        let mut field = field_mut::<String>(&mut owner, "texture").expect("field");
        assert_eq!(field.get(), "old");
        let previous = field.replace("new".to_string());
        assert_eq!(previous, "old");
        assert_eq!(owner.texture, "new");
        assert_eq!(*field_ref::<u32>(&owner, "count").expect("count"), 3);
    }

    #[test]
    fn unknown_name_is_field_not_found() {
        let mut owner = statics();
        let error = field_mut::<String>(&mut owner, "Texture").expect_err("missing");
        assert_eq!(
            error,
            FieldError::FieldNotFound {
                owner: "Statics",
                field: "Texture".to_string(),
            }
        );
    }

    #[test]
    fn wrong_type_is_type_mismatch() {
        let owner = statics();
        let error = check_field::<u64>(&owner, "count").expect_err("mismatch");
        assert!(matches!(
            error,
            FieldError::TypeMismatch { owner: "Statics", ref field, .. } if field == "count"
        ));
    }
}
