//! # Puff
//!
//! Client-side logic for the Puff web app: grading n8n automations, Mrs. Puff style.
//!
//! ## Pages
//!
//! - Landing page, static
//! - Login: name only, kept in local storage ([`session`])
//! - Dashboard: mocked scores and recommendations ([`dashboard`])
//! - Workflows: list a user's n8n workflows and start question generation (`workflows` crate)
//! - Questions: generated questions for one workflow, searchable ([`questions`])
//!
//! ## Reading Questions
//!
//! The questions page reads through a [`store::QuestionSource`]:
//!
//! - directly from Supabase with the anon key, row-level security applies
//! - or through the backend's `/api/questions`, which holds the service-role key
//!
//! Both are built from [`config::ClientConfig`], nothing reads the environment after startup.

pub mod config;
pub mod dashboard;
pub mod questions;
pub mod session;
