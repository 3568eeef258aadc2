//! Role Model (报告流转中的角色)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::report::ReportStatus;
use crate::error::AppError;

/// Workflow role
///
/// Each role owns one content field of a report and one stage of the
/// approval chain. `Admin` is the report-management viewer and may
/// override any field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Staff,
    Chief,
    Sales,
    Accounting,
    Admin,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Staff,
        Role::Chief,
        Role::Sales,
        Role::Accounting,
        Role::Admin,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Staff => "staff",
            Role::Chief => "chief",
            Role::Sales => "sales",
            Role::Accounting => "accounting",
            Role::Admin => "admin",
        }
    }

    /// Statuses visible in this role's report list (`None` = all)
    pub fn visible_statuses(&self) -> Option<&'static [ReportStatus]> {
        match self {
            Role::Staff | Role::Chief | Role::Admin => None,
            Role::Sales => Some(&[
                ReportStatus::ChiefSubmittedToSales,
                ReportStatus::ReturnedBySales,
                ReportStatus::SubmittedToAccounting,
                ReportStatus::ReturnedByAccounting,
                ReportStatus::Completed,
            ]),
            Role::Accounting => Some(&[
                ReportStatus::SubmittedToAccounting,
                ReportStatus::ReturnedByAccounting,
                ReportStatus::Completed,
            ]),
        }
    }

    /// Whether this role may delete reports and staff entries
    pub const fn can_delete(&self) -> bool {
        matches!(self, Role::Chief | Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s.trim())
            .ok_or_else(|| AppError::validation(format!("Unknown role: {}", s)))
    }
}

/// Acting identity supplied by the client
///
/// Never verified: any client may claim any role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub name: String,
    pub role: Role,
}

impl Actor {
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!("sales".parse::<Role>().unwrap(), Role::Sales);
        assert_eq!(" chief ".parse::<Role>().unwrap(), Role::Chief);
        assert!("manager".parse::<Role>().is_err());
    }

    #[test]
    fn test_visible_statuses() {
        assert!(Role::Staff.visible_statuses().is_none());
        let sales = Role::Sales.visible_statuses().unwrap();
        assert!(sales.contains(&ReportStatus::ChiefSubmittedToSales));
        assert!(!sales.contains(&ReportStatus::Draft));
        let accounting = Role::Accounting.visible_statuses().unwrap();
        assert_eq!(accounting.len(), 3);
        assert!(!accounting.contains(&ReportStatus::ReturnedBySales));
    }

    #[test]
    fn test_can_delete() {
        assert!(Role::Chief.can_delete());
        assert!(Role::Admin.can_delete());
        assert!(!Role::Staff.can_delete());
        assert!(!Role::Sales.can_delete());
    }
}
