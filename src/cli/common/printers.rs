// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Pretty printers for reporting information.

use std::{borrow::Cow, sync::Mutex};

const VERTICAL: char = '│';
const UP_AND_RIGHT: char = '└';
const VERTICAL_AND_RIGHT: char = '├';

lazy_static::lazy_static! {
    static ref WARNING_PRINTER: Mutex<Vec<Vec<Cow<'static, str>>>> = Mutex::new(vec![]);
}

/// Collects lines under a title and logs them as a tree.
pub(crate) struct InfoPrinter {
    title: Cow<'static, str>,
    blocks: Vec<Vec<Cow<'static, str>>>,
}

impl InfoPrinter {
    pub(crate) fn new(title: Cow<'static, str>) -> Self {
        Self {
            title,
            blocks: vec![],
        }
    }

    pub(crate) fn push_line(&mut self, line: Cow<'static, str>) {
        self.blocks.push(vec![line]);
    }

    pub(crate) fn push_block(&mut self, block: Vec<Cow<'static, str>>) {
        self.blocks.push(block);
    }

    pub(crate) fn display(self) {
        log::info!("{}", console::style(self.title).bold());
        for (symbol, line) in tree_lines(&self.blocks) {
            log::info!("{symbol} {line}");
        }
        log::info!("");
    }
}

/// Pair every line of `blocks` with the symbol drawn in front of it. The
/// first line of a block gets a branch; any continuation lines are indented
/// under it.
fn tree_lines<'a>(blocks: &'a [Vec<Cow<'static, str>>]) -> Vec<(char, &'a str)> {
    let num_blocks = blocks.len();
    let mut out = vec![];
    for (i_block, block) in blocks.iter().enumerate() {
        let num_lines = block.len();
        for (i_line, line) in block.iter().enumerate() {
            let symbol = match (i_line, i_line + 1 == num_lines, i_block + 1 == num_blocks) {
                (0, false, _) => VERTICAL_AND_RIGHT,
                (0, _, false) => VERTICAL_AND_RIGHT,
                (0, true, true) => UP_AND_RIGHT,
                _ => VERTICAL,
            };
            out.push((symbol, line.as_ref()));
        }
    }
    out
}

pub(crate) trait Warn {
    fn warn(self);
}

fn push_warning(block: Vec<Cow<'static, str>>) {
    WARNING_PRINTER
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .push(block);
}

impl Warn for &'static str {
    fn warn(self) {
        push_warning(vec![self.into()]);
    }
}

impl Warn for String {
    fn warn(self) {
        push_warning(vec![self.into()]);
    }
}

impl Warn for Cow<'static, str> {
    fn warn(self) {
        push_warning(vec![self]);
    }
}

impl Warn for Vec<Cow<'static, str>> {
    fn warn(self) {
        push_warning(self);
    }
}

/// Print out any warnings that have been collected as CLI arguments have been
/// parsed. This should only be called once all arguments have been parsed
/// into parameters.
pub(crate) fn display_warnings() {
    log::debug!("Displaying warnings");
    let mut blocks = WARNING_PRINTER.lock().unwrap_or_else(|e| e.into_inner());
    if blocks.is_empty() {
        return;
    }

    log::warn!("{}", console::style("Warnings").bold());
    for (symbol, line) in tree_lines(&blocks) {
        log::warn!("{symbol} {line}");
    }
    log::warn!("");
    blocks.clear();
}
