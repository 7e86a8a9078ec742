// SPDX-FileCopyrightText: 2026 Graphbind Contributors
// SPDX-License-Identifier: MIT

/// Snapshot-merge implementation: the apply side of [`reconcile`].
/// Keeps `graph::mod` focused on the model surface and transaction plumbing.
impl GraphModel {
    /// Reconcile the node collection against `incoming` and apply the result
    /// inside one suppressed transaction.
    ///
    /// Removals locate their target by key, additions append in snapshot
    /// order, and changed records have only their differing fields
    /// overwritten, so untouched records keep their identity.
    pub fn merge_node_data(&mut self, incoming: &[Record]) -> Result<Reconciliation, ModelError> {
        self.merge_category(Category::Node, incoming)
    }

    /// Link-collection counterpart of [`GraphModel::merge_node_data`].
    pub fn merge_link_data(&mut self, incoming: &[Record]) -> Result<Reconciliation, ModelError> {
        self.merge_category(Category::Link, incoming)
    }

    fn merge_category(
        &mut self,
        category: Category,
        incoming: &[Record],
    ) -> Result<Reconciliation, ModelError> {
        self.with_listeners_suppressed(|model| {
            model.commit(Some("merge data"), |m| m.apply_snapshot(category, incoming))
        })
    }

    pub(crate) fn apply_snapshot(
        &mut self,
        category: Category,
        incoming: &[Record],
    ) -> Result<Reconciliation, ModelError> {
        let accessor = self.key_accessor(category).clone();
        let recon = reconcile(self.records(category), incoming, &accessor)?;
        if recon.is_noop() {
            return Ok(recon);
        }
        let incoming_index = SnapshotIndex::build(incoming, &accessor)?;

        if !recon.removed.is_empty() {
            let removed = recon.removed.iter().collect::<std::collections::HashSet<_>>();
            let current = std::mem::take(self.records_mut(category));
            let mut kept = Vec::with_capacity(current.len());
            for record in current {
                match accessor.key_of(&record) {
                    Some(key) if removed.contains(&key) => {
                        self.collector.record_removed(category, key.clone());
                        self.note(ChangedEvent::Removed { category, key });
                    }
                    _ => kept.push(record),
                }
            }
            *self.records_mut(category) = kept;
        }

        // Post-removal positions; additions only append after this, so the
        // index stays valid for the update phase.
        let target_index = SnapshotIndex::build(self.records(category), &accessor)?;

        for key in &recon.added {
            let Some(at) = incoming_index.get(key) else {
                continue;
            };
            let record = incoming[at].clone();
            self.collector.record_inserted(category, key.clone(), record.clone());
            self.records_mut(category).push(record);
            self.note(ChangedEvent::Inserted {
                category,
                key: key.clone(),
            });
        }

        for key in &recon.changed {
            let (Some(at), Some(source)) = (target_index.get(key), incoming_index.get(key)) else {
                continue;
            };
            let fields = self.records_mut(category)[at].apply_minimal(&incoming[source]);
            if !fields.is_empty() {
                let snapshot = self.records(category)[at].clone();
                self.collector.record_modified(category, key.clone(), snapshot);
                self.note(ChangedEvent::Modified {
                    category,
                    key: key.clone(),
                    fields: fields.to_vec(),
                });
            }
        }

        Ok(recon)
    }
}
