//! CLI presentation: text tables per document type.

use crate::entities::{Blog, Categorized, Collaborator, Event, Paper, Person, Project};
use comfy_table::Table;

fn table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(header);
    table
}

fn cell(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("-")
}

pub fn format_people_table(people: &Categorized<Person>) -> String {
    let mut table = table(vec!["Category", "Slug", "Name", "Title", "Image"]);
    for (category, members) in people {
        for p in members {
            table.add_row(vec![
                category.as_str(),
                p.slug(),
                cell(&p.name),
                cell(&p.title),
                cell(&p.image_url),
            ]);
        }
    }
    table.to_string()
}

pub fn format_events_table(events: &[Event]) -> String {
    let mut table = table(vec!["Slug", "Name", "Start", "Location", "Images"]);
    for e in events {
        let images = e.images.len().to_string();
        table.add_row(vec![
            e.slug(),
            cell(&e.name),
            cell(&e.start_time),
            cell(&e.location),
            images.as_str(),
        ]);
    }
    table.to_string()
}

pub fn format_projects_table(projects: &[Project]) -> String {
    let mut table = table(vec!["Id", "Title", "Category", "Image"]);
    for p in projects {
        table.add_row(vec![p.id(), cell(&p.title), cell(&p.category), cell(&p.image)]);
    }
    table.to_string()
}

pub fn format_collaborators_table(collaborators: &[Collaborator]) -> String {
    let mut table = table(vec!["Id", "Name", "Category", "Logo"]);
    for c in collaborators {
        table.add_row(vec![c.id(), cell(&c.name), cell(&c.category), cell(&c.logo)]);
    }
    table.to_string()
}

pub fn format_papers_table(papers: &[Paper]) -> String {
    let mut table = table(vec!["Title", "Year", "Authors", "Venue"]);
    for p in papers {
        let authors = p.authors.join(", ");
        table.add_row(vec![
            cell(&p.title),
            cell(&p.year),
            authors.as_str(),
            cell(&p.venue),
        ]);
    }
    table.to_string()
}

pub fn format_blogs_table(blogs: &[Blog]) -> String {
    let mut table = table(vec!["Id", "Slug", "Title", "Author", "Date"]);
    for b in blogs {
        let id = b.id.map_or_else(|| "-".to_string(), |id| id.to_string());
        table.add_row(vec![
            id.as_str(),
            b.slug(),
            cell(&b.title),
            cell(&b.author),
            cell(&b.date),
        ]);
    }
    table.to_string()
}

pub fn format_orphans(kind: &str, orphans: &[String]) -> String {
    if orphans.is_empty() {
        return format!("No orphaned {} assets", kind);
    }
    let mut table = table(vec!["Unreferenced asset"]);
    for reference in orphans {
        table.add_row(vec![reference.as_str()]);
    }
    format!("{}\n{} orphaned {} asset(s)", table, orphans.len(), kind)
}
