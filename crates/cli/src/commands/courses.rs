// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::{self, Write};

use crate::cli::OutputFormat;
use crate::display::{format_course_detail, format_course_line};
use crate::error::Result;

use super::{write_json, write_list, State};

/// Lists cached enrolled courses in enrollment order.
pub fn list(state: &State, output: OutputFormat) -> Result<()> {
    list_impl(state, output, &mut io::stdout().lock())
}

pub(crate) fn list_impl(state: &State, output: OutputFormat, out: &mut impl Write) -> Result<()> {
    let courses = state.cache()?.list_enrolled();
    write_list(out, &courses, output, "No enrolled courses", format_course_line)
}

/// Shows one cached course with its modules.
pub fn show(state: &State, course_id: &str, output: OutputFormat) -> Result<()> {
    show_impl(state, course_id, output, &mut io::stdout().lock())
}

pub(crate) fn show_impl(
    state: &State,
    course_id: &str,
    output: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let course = state
        .cache()?
        .get(course_id)?
        .ok_or_else(|| lsync_core::Error::CourseNotFound(course_id.to_string()))?;

    match output {
        OutputFormat::Json => write_json(out, &course),
        OutputFormat::Text => {
            write!(out, "{}", format_course_detail(&course))?;
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "courses_tests.rs"]
mod tests;
