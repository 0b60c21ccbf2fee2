//! Condition evaluation.
//!
//! Each trigger category exposes its attributes through [`ConditionSubject`].
//! A condition field that is unset contributes `true`; a set field must equal
//! the subject's attribute. Severity is compared case-insensitively, every
//! other field exactly. Matchers with no counterpart on a subject (an
//! `alert_name` checked against a purchase order, say) are ignored for that
//! category.

use chrono::{DateTime, Utc};
use maintflow_types::alert::GrafanaAlert;
use maintflow_types::maintenance::{Part, PurchaseOrder, Request, Task, WorkOrder};
use maintflow_types::workflow::{Workflow, WorkflowCondition};

/// Something a workflow condition can be evaluated against.
pub trait ConditionSubject {
    fn satisfies(&self, condition: &WorkflowCondition) -> bool;
}

/// `true` when every condition of the workflow holds (AND of ANDs).
pub fn workflow_matches<S: ConditionSubject + ?Sized>(workflow: &Workflow, subject: &S) -> bool {
    workflow.conditions.iter().all(|c| subject.satisfies(c))
}

fn eq_opt<T: PartialEq>(matcher: &Option<T>, actual: Option<&T>) -> bool {
    match matcher {
        None => true,
        Some(expected) => actual == Some(expected),
    }
}

/// Inclusive range check. A bounded range never matches a missing instant.
fn within(start: &Option<DateTime<Utc>>, end: &Option<DateTime<Utc>>, at: Option<DateTime<Utc>>) -> bool {
    if start.is_none() && end.is_none() {
        return true;
    }
    let Some(at) = at else {
        return false;
    };
    start.is_none_or(|s| at >= s) && end.is_none_or(|e| at <= e)
}

fn created_within(c: &WorkflowCondition, created_at: DateTime<Utc>) -> bool {
    within(&c.created_time_start, &c.created_time_end, Some(created_at))
}

impl ConditionSubject for WorkOrder {
    fn satisfies(&self, c: &WorkflowCondition) -> bool {
        eq_opt(&c.asset, self.asset_id.as_ref())
            && eq_opt(&c.location, self.location_id.as_ref())
            && eq_opt(&c.user, self.primary_user_id.as_ref())
            && eq_opt(&c.team, self.team_id.as_ref())
            && eq_opt(&c.category, self.category_id.as_ref())
            && eq_opt(&c.priority, Some(&self.priority))
            && eq_opt(&c.work_order_status, Some(&self.status))
            && created_within(c, self.created_at)
            && within(&c.start_date, &c.end_date, self.due_date)
    }
}

impl ConditionSubject for Request {
    fn satisfies(&self, c: &WorkflowCondition) -> bool {
        eq_opt(&c.asset, self.asset_id.as_ref())
            && eq_opt(&c.location, self.location_id.as_ref())
            && eq_opt(&c.user, self.primary_user_id.as_ref())
            && eq_opt(&c.team, self.team_id.as_ref())
            && eq_opt(&c.category, self.category_id.as_ref())
            && eq_opt(&c.priority, Some(&self.priority))
            && eq_opt(&c.work_order_status, Some(&self.status))
            && created_within(c, self.created_at)
            && within(&c.start_date, &c.end_date, self.due_date)
    }
}

impl ConditionSubject for PurchaseOrder {
    fn satisfies(&self, c: &WorkflowCondition) -> bool {
        eq_opt(&c.vendor, self.vendor_id.as_ref())
            && eq_opt(&c.category, self.category_id.as_ref())
            && eq_opt(&c.purchase_order_status, Some(&self.status))
            && created_within(c, self.created_at)
    }
}

impl ConditionSubject for Part {
    fn satisfies(&self, c: &WorkflowCondition) -> bool {
        eq_opt(&c.part, Some(&self.id))
            && eq_opt(&c.vendor, self.vendor_id.as_ref())
            && eq_opt(&c.category, self.category_id.as_ref())
            && eq_opt(&c.number_value, Some(&self.quantity))
            && created_within(c, self.created_at)
    }
}

impl ConditionSubject for Task {
    fn satisfies(&self, c: &WorkflowCondition) -> bool {
        eq_opt(&c.label, Some(&self.label))
            && eq_opt(&c.value, self.value.as_ref())
            && eq_opt(&c.number_value, self.number_value.as_ref())
            && eq_opt(&c.asset, self.asset_id.as_ref())
            && created_within(c, self.created_at)
    }
}

impl ConditionSubject for GrafanaAlert {
    fn satisfies(&self, c: &WorkflowCondition) -> bool {
        let name_ok = match c.alert_name.as_deref() {
            None | Some("") => true,
            Some(name) => name == self.alert_name,
        };
        let severity_ok = match c.severity.as_deref() {
            None | Some("") => true,
            Some(sev) => sev.eq_ignore_ascii_case(&self.severity),
        };
        name_ok && severity_ok
    }
}
