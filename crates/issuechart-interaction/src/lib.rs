//! Jira-facing adapters: the reqwest request function and the backend
//! resolver exposed through the invoke bridge.

pub mod jira_requester;
pub mod resolver;

pub use jira_requester::JiraRequester;
pub use resolver::{FetchProjects, Resolver, ResolverFunction};
