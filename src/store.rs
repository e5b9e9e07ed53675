//! In-memory editor state for the proposal: the client record, the ordered
//! line-item list, and the single draft buffer bound to the input fields.
//!
//! All mutation goes through the operations here. Committing the draft
//! either appends a new item or, when an item was selected for editing,
//! overwrites it in place.

use uuid::Uuid;

use crate::currency;
use crate::error::AppError;
use crate::model::{ClientRecord, LineItem, Unit};

/// Which draft field a raw input value targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Name,
    Details,
    Unit,
    UnitPrice,
    Quantity,
}

/// The not-yet-committed line item, mirroring the input controls.
/// The unit stays a raw string until commit validates it against the
/// closed set.
#[derive(Debug, Clone, Default)]
pub struct Draft {
    pub name: String,
    pub details: String,
    pub unit: String,
    pub unit_price: String,
    pub quantity: String,
}

pub struct QuoteStore {
    pub client: ClientRecord,
    items: Vec<LineItem>,
    draft: Draft,
    editing_id: Option<Uuid>,
}

impl QuoteStore {
    pub fn new(client: ClientRecord) -> Self {
        QuoteStore {
            client,
            items: Vec::new(),
            draft: Draft::default(),
            editing_id: None,
        }
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn editing_id(&self) -> Option<Uuid> {
        self.editing_id
    }

    /// Update one draft field. The unit price goes through the currency
    /// mask on every change; all other fields are stored verbatim.
    pub fn set_field(&mut self, field: DraftField, raw: &str) {
        match field {
            DraftField::Name => self.draft.name = raw.to_string(),
            DraftField::Details => self.draft.details = raw.to_string(),
            DraftField::Unit => self.draft.unit = raw.to_string(),
            DraftField::UnitPrice => self.draft.unit_price = currency::mask(raw),
            DraftField::Quantity => self.draft.quantity = raw.to_string(),
        }
    }

    /// Commit the draft: overwrite the item selected for editing, or append
    /// a new one with a fresh id.
    ///
    /// Fails without side effects when a required field is empty or the unit
    /// is not in the closed set. An editing id that no longer matches any
    /// item (the item was removed mid-edit) falls through to the append
    /// path, so the orphaned draft re-enters the list as a new item.
    pub fn commit_draft(&mut self) -> Result<(), AppError> {
        if self.draft.name.trim().is_empty() {
            return Err(AppError::MissingField("service name"));
        }
        if self.draft.unit.trim().is_empty() {
            return Err(AppError::MissingField("unit"));
        }
        if self.draft.unit_price.trim().is_empty() {
            return Err(AppError::MissingField("unit price"));
        }
        if self.draft.quantity.trim().is_empty() {
            return Err(AppError::MissingField("quantity"));
        }

        let unit: Unit = self.draft.unit.trim().parse()?;
        let details = if self.draft.details.trim().is_empty() {
            None
        } else {
            Some(self.draft.details.clone())
        };

        let editing = self
            .editing_id
            .take()
            .and_then(|id| self.items.iter_mut().find(|item| item.id == id));

        match editing {
            Some(item) => {
                item.name = self.draft.name.clone();
                item.details = details;
                item.unit = unit;
                item.unit_price = self.draft.unit_price.clone();
                item.quantity = self.draft.quantity.clone();
            }
            None => {
                self.items.push(LineItem {
                    id: Uuid::new_v4(),
                    name: self.draft.name.clone(),
                    details,
                    unit,
                    unit_price: self.draft.unit_price.clone(),
                    quantity: self.draft.quantity.clone(),
                });
            }
        }

        self.draft = Draft::default();
        Ok(())
    }

    /// Copy an item's fields into the draft and mark it for overwrite on the
    /// next commit. Silent no-op when the id is absent.
    pub fn select_for_edit(&mut self, id: Uuid) {
        if let Some(item) = self.items.iter().find(|item| item.id == id) {
            self.draft = Draft {
                name: item.name.clone(),
                details: item.details.clone().unwrap_or_default(),
                unit: item.unit.to_string(),
                unit_price: item.unit_price.clone(),
                quantity: item.quantity.clone(),
            };
            self.editing_id = Some(id);
        }
    }

    /// Remove the item with the given id; no-op when absent. Does not touch
    /// the draft or the editing selection.
    pub fn remove(&mut self, id: Uuid) {
        self.items.retain(|item| item.id != id);
    }

    /// Empty the list. The draft and editing selection are left alone.
    pub fn clear_all(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> QuoteStore {
        QuoteStore::new(ClientRecord {
            name: "Maria Silva".to_string(),
            email: None,
            phone: None,
        })
    }

    fn fill_draft(store: &mut QuoteStore, name: &str, raw_price: &str, quantity: &str) {
        store.set_field(DraftField::Name, name);
        store.set_field(DraftField::Unit, "m²");
        store.set_field(DraftField::UnitPrice, raw_price);
        store.set_field(DraftField::Quantity, quantity);
    }

    #[test]
    fn commits_append_items_with_unique_ids() {
        let mut store = store();
        for i in 0..5 {
            fill_draft(&mut store, &format!("Serviço {}", i), "1500", "1");
            store.commit_draft().unwrap();
        }
        assert_eq!(store.items().len(), 5);

        let mut ids: Vec<_> = store.items().iter().map(|item| item.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn price_entry_goes_through_the_mask() {
        let mut store = store();
        store.set_field(DraftField::UnitPrice, "1500");
        assert_eq!(store.draft().unit_price, "R$ 15,00");
    }

    #[test]
    fn commit_resets_draft_and_editing_state() {
        let mut store = store();
        fill_draft(&mut store, "Pintura", "1500", "10");
        store.set_field(DraftField::Details, "duas demãos");
        store.commit_draft().unwrap();

        assert!(store.draft().name.is_empty());
        assert!(store.draft().unit_price.is_empty());
        assert_eq!(store.editing_id(), None);
        assert_eq!(store.items()[0].details.as_deref(), Some("duas demãos"));
    }

    #[test]
    fn missing_field_fails_and_leaves_everything_unchanged() {
        let mut store = store();
        fill_draft(&mut store, "Pintura", "1500", "10");
        store.commit_draft().unwrap();

        store.set_field(DraftField::Name, "Reboco");
        store.set_field(DraftField::UnitPrice, "2000");
        // Unit and quantity left empty.
        assert!(store.commit_draft().is_err());
        assert_eq!(store.items().len(), 1);
        assert_eq!(store.draft().name, "Reboco");
        assert_eq!(store.draft().unit_price, "R$ 20,00");
    }

    #[test]
    fn commit_rejects_unknown_unit() {
        let mut store = store();
        fill_draft(&mut store, "Pintura", "1500", "10");
        store.set_field(DraftField::Unit, "parsecs");
        assert!(matches!(
            store.commit_draft(),
            Err(AppError::UnknownUnit(_))
        ));
        assert!(store.items().is_empty());
    }

    #[test]
    fn editing_preserves_position_and_length() {
        let mut store = store();
        for name in ["Primeiro", "Segundo", "Terceiro"] {
            fill_draft(&mut store, name, "1000", "1");
            store.commit_draft().unwrap();
        }

        let target = store.items()[1].id;
        store.select_for_edit(target);
        assert_eq!(store.editing_id(), Some(target));
        assert_eq!(store.draft().name, "Segundo");

        store.set_field(DraftField::Name, "Segundo (revisado)");
        store.commit_draft().unwrap();

        assert_eq!(store.items().len(), 3);
        assert_eq!(store.items()[1].id, target);
        assert_eq!(store.items()[1].name, "Segundo (revisado)");
        assert_eq!(store.items()[0].name, "Primeiro");
        assert_eq!(store.items()[2].name, "Terceiro");
    }

    #[test]
    fn select_for_edit_with_unknown_id_is_a_noop() {
        let mut store = store();
        fill_draft(&mut store, "Pintura", "1500", "10");
        store.commit_draft().unwrap();

        store.select_for_edit(Uuid::new_v4());
        assert_eq!(store.editing_id(), None);
        assert!(store.draft().name.is_empty());
    }

    #[test]
    fn remove_deletes_only_the_target() {
        let mut store = store();
        for name in ["A", "B", "C"] {
            fill_draft(&mut store, name, "1000", "1");
            store.commit_draft().unwrap();
        }
        let target = store.items()[1].id;
        store.remove(target);
        assert_eq!(store.items().len(), 2);
        assert!(store.items().iter().all(|item| item.id != target));

        store.remove(Uuid::new_v4());
        assert_eq!(store.items().len(), 2);
    }

    #[test]
    fn clear_all_empties_the_list() {
        let mut store = store();
        fill_draft(&mut store, "Pintura", "1500", "10");
        store.commit_draft().unwrap();
        store.clear_all();
        assert!(store.items().is_empty());

        store.clear_all();
        assert!(store.items().is_empty());
    }

    #[test]
    fn orphaned_edit_commits_as_a_new_item() {
        let mut store = store();
        fill_draft(&mut store, "Pintura", "1500", "10");
        store.commit_draft().unwrap();

        let original = store.items()[0].id;
        store.select_for_edit(original);
        store.remove(original);
        assert!(store.items().is_empty());

        // The draft still holds the removed item; committing re-inserts it
        // under a fresh id.
        store.commit_draft().unwrap();
        assert_eq!(store.items().len(), 1);
        assert_ne!(store.items()[0].id, original);
        assert_eq!(store.items()[0].name, "Pintura");
    }
}
