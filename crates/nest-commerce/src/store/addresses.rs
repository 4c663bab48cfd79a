//! Saved address persistence.

use super::{current_timestamp, Store};
use crate::checkout::{Address, AddressDraft};
use crate::error::CommerceError;
use crate::ids::{AddressId, UserId};
use nest_db::{params, Executor};
use serde::Deserialize;

const ADDRESS_SELECT: &str = "SELECT id, user_id, full_name, phone, address_line1, address_line2, \
    city, state, postal_code, country, is_default, created_at, updated_at FROM addresses";

#[derive(Deserialize)]
struct AddressRow {
    id: AddressId,
    user_id: UserId,
    full_name: String,
    phone: String,
    address_line1: String,
    address_line2: Option<String>,
    city: String,
    state: Option<String>,
    postal_code: String,
    country: String,
    #[serde(deserialize_with = "crate::flag::deserialize")]
    is_default: bool,
    created_at: i64,
    updated_at: i64,
}

impl From<AddressRow> for Address {
    fn from(row: AddressRow) -> Self {
        Address {
            id: row.id,
            user_id: row.user_id,
            full_name: row.full_name,
            phone: row.phone,
            address_line1: row.address_line1,
            address_line2: row.address_line2,
            city: row.city,
            state: row.state,
            postal_code: row.postal_code,
            country: row.country,
            is_default: row.is_default,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Load an address owned by `user_id`.
pub(super) fn owned_address<E: Executor>(
    ex: &E,
    user_id: UserId,
    id: AddressId,
) -> Result<Address, CommerceError> {
    let sql = format!("{} WHERE id = ? AND user_id = ?", ADDRESS_SELECT);
    ex.query_optional::<AddressRow>(&sql, params![id, user_id])?
        .map(Address::from)
        .ok_or(CommerceError::AddressNotFound(id))
}

fn clear_default<E: Executor>(ex: &E, user_id: UserId, keep: AddressId) -> Result<(), CommerceError> {
    ex.execute(
        "UPDATE addresses SET is_default = 0 WHERE user_id = ? AND id != ?",
        params![user_id, keep],
    )?;
    Ok(())
}

impl Store {
    /// The user's saved addresses, default first.
    pub fn addresses(&self, user_id: UserId) -> Result<Vec<Address>, CommerceError> {
        let sql = format!(
            "{} WHERE user_id = ? ORDER BY is_default DESC, created_at DESC, id DESC",
            ADDRESS_SELECT
        );
        let rows: Vec<AddressRow> = self.db().query_as(&sql, params![user_id])?;
        Ok(rows.into_iter().map(Address::from).collect())
    }

    pub fn address(&self, user_id: UserId, id: AddressId) -> Result<Address, CommerceError> {
        owned_address(self.db(), user_id, id)
    }

    /// Save a new address.
    pub fn create_address(&self, user_id: UserId, draft: &AddressDraft) -> Result<Address, CommerceError> {
        draft.validate()?;
        let now = current_timestamp();
        self.db().transaction(|tx| {
            let id = AddressId::new(tx.insert(
                "INSERT INTO addresses (user_id, full_name, phone, address_line1, address_line2, \
                 city, state, postal_code, country, is_default, created_at, updated_at) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                params![
                    user_id,
                    draft.full_name.trim(),
                    draft.phone.trim(),
                    draft.address_line1.trim(),
                    draft.address_line2.clone(),
                    draft.city.trim(),
                    draft.state.clone(),
                    draft.postal_code.trim(),
                    draft.country.trim(),
                    draft.is_default,
                    now,
                    now
                ],
            )?);
            if draft.is_default {
                clear_default(tx, user_id, id)?;
            }
            owned_address(tx, user_id, id)
        })
    }

    /// Replace an address's fields.
    pub fn update_address(
        &self,
        user_id: UserId,
        id: AddressId,
        draft: &AddressDraft,
    ) -> Result<Address, CommerceError> {
        draft.validate()?;
        self.db().transaction(|tx| {
            owned_address(tx, user_id, id)?;
            tx.execute(
                "UPDATE addresses SET full_name = ?, phone = ?, address_line1 = ?, \
                 address_line2 = ?, city = ?, state = ?, postal_code = ?, country = ?, \
                 is_default = ?, updated_at = ? WHERE id = ?",
                params![
                    draft.full_name.trim(),
                    draft.phone.trim(),
                    draft.address_line1.trim(),
                    draft.address_line2.clone(),
                    draft.city.trim(),
                    draft.state.clone(),
                    draft.postal_code.trim(),
                    draft.country.trim(),
                    draft.is_default,
                    current_timestamp(),
                    id
                ],
            )?;
            if draft.is_default {
                clear_default(tx, user_id, id)?;
            }
            owned_address(tx, user_id, id)
        })
    }

    pub fn delete_address(&self, user_id: UserId, id: AddressId) -> Result<(), CommerceError> {
        let changed = self.db().execute(
            "DELETE FROM addresses WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;
        if changed == 0 {
            return Err(CommerceError::AddressNotFound(id));
        }
        Ok(())
    }

    /// Make `id` the user's only default address.
    pub fn set_default_address(&self, user_id: UserId, id: AddressId) -> Result<Address, CommerceError> {
        self.db().transaction(|tx| {
            owned_address(tx, user_id, id)?;
            tx.execute(
                "UPDATE addresses SET is_default = 1, updated_at = ? WHERE id = ?",
                params![current_timestamp(), id],
            )?;
            clear_default(tx, user_id, id)?;
            owned_address(tx, user_id, id)
        })
    }
}
