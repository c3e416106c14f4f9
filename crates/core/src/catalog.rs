//! Static project catalog.
//!
//! The catalog is compiled into the binary and never persisted. Projects and
//! their task lists are indexed in parallel: `PROJECT_TASKS[i]` belongs to
//! `PROJECTS[i]`, and `PROJECTS[i].id == i`.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::ProjectIndex;

/// An external reading link attached to a project.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Resource {
    pub label: &'static str,
    pub url: &'static str,
}

/// A sample project users can work through.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Project {
    pub id: ProjectIndex,
    pub name: &'static str,
    pub description: &'static str,
    /// Relative path of the cover image served with the front end.
    pub image: &'static str,
    pub resources: &'static [Resource],
}

pub const PROJECTS: &[Project] = &[
    Project {
        id: 0,
        name: "Web-Based Organizational Support System",
        description: "This project helps organizations manage information, visualize dashboards, and respond to inquiries.",
        image: "images/kevs4.jpeg",
        resources: &[
            Resource {
                label: "Project Spec (PDF)",
                url: "https://example.com/web-org-spec.pdf",
            },
            Resource {
                label: "Dashboard Patterns",
                url: "https://uxdesign.cc/dashboard-patterns",
            },
            Resource {
                label: "Flask Tutorials",
                url: "https://flask.palletsprojects.com/en/2.2.x/tutorial/",
            },
        ],
    },
    Project {
        id: 1,
        name: "Student Information Management System",
        description: "Manages student records, academic performance, and attendance.",
        image: "images/kevs2.jpeg",
        resources: &[
            Resource {
                label: "Education Data Models",
                url: "https://example.com/edu-data-models",
            },
            Resource {
                label: "Reporting Best Practices",
                url: "https://www.smartsheet.com/reporting-best-practices",
            },
            Resource {
                label: "SQLite vs Postgres",
                url: "https://www.postgresql.org/docs/current/datatype-json.html",
            },
        ],
    },
    Project {
        id: 2,
        name: "Smart Room Energy Monitoring System",
        description: "Monitors and visualizes room energy usage using digital meters.",
        image: "images/kevs1.jpeg",
        resources: &[
            Resource {
                label: "IoT Energy Monitoring Guide",
                url: "https://example.com/iot-energy-guide",
            },
            Resource {
                label: "Data Visualization Tips",
                url: "https://observablehq.com/@d3/visualization",
            },
            Resource {
                label: "MQTT Intro",
                url: "https://mqtt.org/documentation",
            },
        ],
    },
    Project {
        id: 3,
        name: "Library Management System",
        description: "Manages book records, borrowing, returns, and users.",
        image: "images/download.jpeg",
        resources: &[
            Resource {
                label: "Library Systems Overview",
                url: "https://example.com/library-systems",
            },
            Resource {
                label: "Cataloging Standards",
                url: "https://www.oclc.org/en/worldcat.html",
            },
            Resource {
                label: "User Authentication Patterns",
                url: "https://www.owasp.org/index.php/Authentication_Cheat_Sheet",
            },
        ],
    },
];

pub const PROJECT_TASKS: &[&[&str]] = &[
    &[
        "Requirement Gathering",
        "Design",
        "Development",
        "Testing",
        "Deployment",
    ],
    &[
        "Student Data Entry",
        "Grades Input",
        "Attendance Tracking",
        "Reporting",
    ],
    &[
        "Meter Installation",
        "Data Monitoring",
        "Visualization",
        "Alerts Setup",
    ],
    &[
        "Book Cataloging",
        "Borrowing Management",
        "Return Tracking",
        "User Accounts",
    ],
];

/// Number of projects in the catalog.
pub fn project_count() -> u32 {
    PROJECTS.len() as u32
}

/// Index of the final project; completing it never advances the unlock pointer.
pub fn last_project_index() -> ProjectIndex {
    project_count().saturating_sub(1)
}

/// Ensure `index` names a catalog project.
pub fn validate_project_index(index: ProjectIndex) -> Result<(), CoreError> {
    if index >= project_count() {
        return Err(CoreError::Validation(format!(
            "project_index must be < {}, got {index}",
            project_count()
        )));
    }
    Ok(())
}
