use crate::actor_framework::Entity;
use crate::domain::{Customer, CustomerCreate, CustomerPatch};

fn validate(name: &str, email: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Name required".to_string());
    }
    if !email.contains('@') {
        return Err(format!("Invalid email: {email}"));
    }
    Ok(())
}

impl Entity for Customer {
    type Id = String;
    type CreateParams = CustomerCreate;
    type Patch = CustomerPatch;
    type Action = ();
    type ActionResult = ();

    /// Creates a new Customer from creation parameters.
    ///
    /// # Errors
    /// Rejects an empty name or an email without `@`.
    fn from_create_params(id: String, params: CustomerCreate) -> Result<Self, String> {
        validate(&params.name, &params.email)?;
        Ok(Self {
            id,
            name: params.name,
            email: params.email,
            phone: params.phone,
        })
    }

    /// Updates contact details. The patched record must still validate.
    fn on_update(&mut self, patch: CustomerPatch) -> Result<(), String> {
        let name = patch.name.unwrap_or_else(|| self.name.clone());
        let email = patch.email.unwrap_or_else(|| self.email.clone());
        validate(&name, &email)?;
        self.name = name;
        self.email = email;
        if patch.phone.is_some() {
            self.phone = patch.phone;
        }
        Ok(())
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), String> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_missing_name_and_bad_email() {
        assert!(Customer::from_create_params("c".into(), CustomerCreate::new(" ", "a@b.io")).is_err());
        assert!(Customer::from_create_params("c".into(), CustomerCreate::new("Acme", "acme.io")).is_err());
    }

    #[test]
    fn failed_update_leaves_record_untouched() {
        let mut customer = Customer::from_create_params("c".into(), CustomerCreate::new("Acme", "ops@acme.io")).unwrap();
        let patch = CustomerPatch { name: Some("Acme Ltd".into()), email: Some("nope".into()), phone: None };
        assert!(customer.on_update(patch).is_err());
        assert_eq!(customer.name, "Acme");

        let patch = CustomerPatch { phone: Some("+44 20 7946 0000".into()), ..Default::default() };
        customer.on_update(patch).unwrap();
        assert_eq!(customer.phone.as_deref(), Some("+44 20 7946 0000"));
    }
}
