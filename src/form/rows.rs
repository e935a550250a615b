//! Per-row cascades of the assignment formset.
//!
//! Each row has two dependency edges: vaccination point → brigades and personnel type →
//! roles. Changing a source selector bumps that edge's generation and hands out a
//! [`FetchTicket`]. A completion is applied only if the row still shows the selection the
//! ticket was issued for and no newer ticket exists for the same edge.

use std::collections::BTreeMap;

use super::effects::UiEffect;
use super::events::RowSnapshot;
use crate::errors::FormError;
use crate::models::{
    AssignmentRow, DependencyEdge, OptionItem, PersonnelType, RowField, RowIndex,
};
use crate::remote::FetchTicket;

/// Inline notice shown next to a selector whose options could not be refreshed.
pub const FETCH_FAILED_TEXT: &str = "No se pudieron cargar las opciones, intente nuevamente";

#[derive(Debug, Clone)]
pub struct RowDependencyCoordinator {
    rows: BTreeMap<RowIndex, AssignmentRow>,
    coordination_team_id: String,
}

impl RowDependencyCoordinator {
    pub fn new(coordination_team_id: impl Into<String>) -> Self {
        Self {
            rows: BTreeMap::new(),
            coordination_team_id: coordination_team_id.into(),
        }
    }

    pub fn row(&self, index: RowIndex) -> Option<&AssignmentRow> {
        self.rows.get(&index)
    }

    pub fn rows(&self) -> impl Iterator<Item = &AssignmentRow> {
        self.rows.values()
    }

    /// Rows are created by the formset; the first event from a row registers it.
    fn row_mut(&mut self, index: RowIndex) -> &mut AssignmentRow {
        self.rows
            .entry(index)
            .or_insert_with(|| AssignmentRow::new(index))
    }

    /// Register a row rendered by the server, without fetching anything.
    pub fn restore(&mut self, snapshot: RowSnapshot) -> Vec<UiEffect> {
        let sentinel = self.is_sentinel(&snapshot.personnel_type);
        let row = self.row_mut(snapshot.row);

        row.point = snapshot.point;
        row.personnel_type = snapshot.personnel_type;
        row.brigades.options = snapshot.brigade_options;
        row.brigades.selected = snapshot.brigades;
        row.roles.options = snapshot.role_options;
        row.roles.selected = snapshot.role.into_iter().filter(|r| !r.is_empty()).collect();

        Self::set_disabled(row, sentinel)
    }

    /// Point selector changed. Empty points issue no fetch and leave brigades as they are.
    pub fn on_point_changed(&mut self, index: RowIndex, point: &str) -> Option<FetchTicket> {
        let row = self.row_mut(index);
        row.point = point.to_string();
        row.brigades.generation += 1;

        if point.is_empty() {
            tracing::debug!("Row {} point cleared, keeping brigade options", index);
            return None;
        }

        Some(Self::ticket(row, DependencyEdge::PointToBrigades))
    }

    /// Personnel type changed. Always fetches roles; the coordination team sentinel
    /// disables brigade and production regardless of what the fetch returns.
    pub fn on_personnel_type_changed(
        &mut self,
        index: RowIndex,
        personnel_type: &str,
    ) -> (Vec<UiEffect>, FetchTicket) {
        let sentinel = self.is_sentinel(personnel_type);
        let row = self.row_mut(index);
        row.personnel_type = personnel_type.to_string();
        row.roles.generation += 1;

        let effects = Self::set_disabled(row, sentinel);
        (effects, Self::ticket(row, DependencyEdge::PersonnelTypeToRoles))
    }

    /// User picked brigades or a role; remembered so it survives the next repopulation.
    pub fn on_selection_changed(&mut self, index: RowIndex, field: RowField, values: Vec<String>) {
        let row = self.row_mut(index);
        match field {
            RowField::Brigades => row.brigades.selected = values,
            RowField::Role => row.roles.selected = values.into_iter().take(1).collect(),
            RowField::Point | RowField::PersonnelType | RowField::Production => {
                tracing::debug!("Row {} {:?} has no dependent state", index, field);
            }
        }
    }

    /// Apply the result of a fetch if it is still the one that matters.
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<OptionItem>, FormError>,
    ) -> Vec<UiEffect> {
        let Some(row) = self.rows.get_mut(&ticket.row) else {
            tracing::warn!("Dropping {:?} result for unknown row {}", ticket.edge, ticket.row);
            return Vec::new();
        };

        let current_generation = row.dependent(ticket.edge).generation;
        if row.source_value(ticket.edge) != ticket.selection || current_generation != ticket.generation {
            tracing::debug!(
                "Discarding stale {:?} result for row {} (issued for {:?} gen {}, now {:?} gen {})",
                ticket.edge,
                ticket.row,
                ticket.selection,
                ticket.generation,
                row.source_value(ticket.edge),
                current_generation
            );
            return Vec::new();
        }

        let target = ticket.edge.target();
        let dependent = row.dependent_mut(ticket.edge);

        match result {
            Ok(options) => {
                dependent.repopulate(options);
                tracing::debug!(
                    "Row {} {:?} repopulated with {} options, {} kept selected",
                    ticket.row,
                    target,
                    dependent.options.len(),
                    dependent.selected.len()
                );
                vec![
                    UiEffect::row_effect(ticket.row, target).options(dependent.options.clone()),
                    UiEffect::row_effect(ticket.row, target).selection(dependent.selected.clone()),
                ]
            }
            Err(err) => {
                tracing::warn!(
                    "Could not refresh {:?} for row {} ({:?}): {}",
                    target,
                    ticket.row,
                    ticket.selection,
                    err
                );
                dependent.last_error = Some(err.message());
                vec![UiEffect::row_effect(ticket.row, target)
                    .fetch_failed(FETCH_FAILED_TEXT.to_string())]
            }
        }
    }

    fn is_sentinel(&self, personnel_type: &str) -> bool {
        PersonnelType::parse(personnel_type).is_sentinel(&self.coordination_team_id)
    }

    fn ticket(row: &AssignmentRow, edge: DependencyEdge) -> FetchTicket {
        FetchTicket {
            row: row.index,
            edge,
            selection: row.source_value(edge).to_string(),
            generation: row.dependent(edge).generation,
        }
    }

    fn set_disabled(row: &mut AssignmentRow, disabled: bool) -> Vec<UiEffect> {
        row.brigade_disabled = disabled;
        row.production_disabled = disabled;
        vec![
            UiEffect::row_effect(row.index, RowField::Brigades).disabled(disabled),
            UiEffect::row_effect(row.index, RowField::Production).disabled(disabled),
        ]
    }
}
