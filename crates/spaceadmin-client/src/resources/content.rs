//! Blog posts and job openings

use super::{Creatable, Editable, Resource};
use spaceadmin_core::ListShape;
use spaceadmin_core::permission::modules;
use spaceadmin_core::types::{Blog, BlogDraft, Job, JobDraft};

/// Blog posts; search goes by title
#[derive(Debug, Clone, Copy)]
pub struct Blogs;

impl Resource for Blogs {
    const NAME: &'static str = "blog";
    const MODULE: &'static str = modules::BLOGS;
    const BASE: &'static str = "/blog";
    const ROUTE: &'static str = "/blogs";
    const SEARCH_KEY: &'static str = "title";
    const LIST_SHAPE: ListShape = ListShape::Paged;

    type Record = Blog;
}

impl Creatable for Blogs {
    type Draft = BlogDraft;
}

impl Editable for Blogs {}

/// Job openings; search goes by title
#[derive(Debug, Clone, Copy)]
pub struct Jobs;

impl Resource for Jobs {
    const NAME: &'static str = "job";
    const MODULE: &'static str = modules::JOBS;
    const BASE: &'static str = "/job";
    const ROUTE: &'static str = "/jobs";
    const SEARCH_KEY: &'static str = "title";
    const LIST_SHAPE: ListShape = ListShape::Paged;

    type Record = Job;
}

impl Creatable for Jobs {
    type Draft = JobDraft;
}

impl Editable for Jobs {}
