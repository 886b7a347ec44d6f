// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Local entity cache of courses.
//!
//! Courses are stored one per key (`course:{id}`) and the materialized
//! enrolled list is stored as an ordered list of ids under `enrolled`.
//! Keeping ids rather than course copies means an updated course is
//! visible through [`EntityCache::list_enrolled`] as soon as it is written.
//!
//! Every mutation persists before the in-memory view changes, so a failed
//! write leaves the cache exactly as it was.

use std::collections::HashMap;

use crate::course::Course;
use crate::error::Result;
use crate::store::{read_json, write_json, KvStore};

const COURSE_KEY_PREFIX: &str = "course:";
const ENROLLED_KEY: &str = "enrolled";

fn course_key(id: &str) -> String {
    format!("{COURSE_KEY_PREFIX}{id}")
}

/// Durable course cache with a materialized enrolled list.
pub struct EntityCache<S: KvStore> {
    store: S,
    courses: HashMap<String, Course>,
    enrolled: Vec<String>,
}

impl<S: KvStore> EntityCache<S> {
    /// Opens the cache, loading the enrolled list and its courses.
    ///
    /// Courses outside the enrolled list are loaded lazily on first access.
    pub fn open(store: S) -> Result<Self> {
        let enrolled: Vec<String> = read_json(&store, ENROLLED_KEY)?.unwrap_or_default();
        let mut courses = HashMap::new();
        for id in &enrolled {
            if let Some(course) = read_json::<Course>(&store, &course_key(id))? {
                courses.insert(id.clone(), course);
            }
        }

        Ok(EntityCache { store, courses, enrolled })
    }

    /// Stores a course, replacing any cached copy.
    pub fn put(&mut self, course: Course) -> Result<()> {
        write_json(&self.store, &course_key(&course.id), &course)?;
        self.courses.insert(course.id.clone(), course);
        Ok(())
    }

    /// Returns the cached course, if any.
    pub fn get(&mut self, id: &str) -> Result<Option<Course>> {
        if let Some(course) = self.courses.get(id) {
            return Ok(Some(course.clone()));
        }
        let loaded: Option<Course> = read_json(&self.store, &course_key(id))?;
        if let Some(ref course) = loaded {
            self.courses.insert(id.to_string(), course.clone());
        }
        Ok(loaded)
    }

    /// Read-modify-write of one course.
    ///
    /// Returns `None` without touching storage when the course is not cached.
    pub fn update<F>(&mut self, id: &str, f: F) -> Result<Option<Course>>
    where
        F: FnOnce(Course) -> Course,
    {
        let Some(current) = self.get(id)? else {
            return Ok(None);
        };

        let mut updated = f(current);
        // The cache key is the identity; a transform cannot move the entry
        updated.id = id.to_string();
        self.put(updated.clone())?;
        Ok(Some(updated))
    }

    /// Returns the enrolled courses in materialized order.
    ///
    /// Ids whose course entry is missing are skipped.
    pub fn list_enrolled(&self) -> Vec<Course> {
        self.enrolled.iter().filter_map(|id| self.courses.get(id).cloned()).collect()
    }

    /// Ids in the materialized enrolled list.
    pub fn enrolled_ids(&self) -> &[String] {
        &self.enrolled
    }

    pub fn is_enrolled(&self, id: &str) -> bool {
        self.enrolled.iter().any(|e| e == id)
    }

    /// Appends a course id to the enrolled list if it is not already there.
    pub fn add_enrolled(&mut self, id: &str) -> Result<bool> {
        if self.is_enrolled(id) {
            return Ok(false);
        }
        let mut next = self.enrolled.clone();
        next.push(id.to_string());
        write_json(&self.store, ENROLLED_KEY, &next)?;
        self.enrolled = next;
        Ok(true)
    }

    /// Replaces the enrolled list with `courses`, caching each of them.
    ///
    /// The given order becomes the materialized order. Duplicate ids keep
    /// their first position.
    pub fn replace_enrolled(&mut self, courses: Vec<Course>) -> Result<()> {
        let mut ids: Vec<String> = Vec::with_capacity(courses.len());
        for course in &courses {
            if !ids.contains(&course.id) {
                ids.push(course.id.clone());
            }
        }

        for course in courses {
            self.put(course)?;
        }
        write_json(&self.store, ENROLLED_KEY, &ids)?;
        self.enrolled = ids;
        Ok(())
    }

    /// Number of courses currently loaded in memory.
    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
