//! Panel title computation.

use std::borrow::Cow;

use quarry_protocol::{Position, Query};

pub const ELLIPSIS: char = '…';

/// Cuts `text` to `budget` characters, ending the cut text with an ellipsis.
pub fn truncate(text: &str, budget: usize) -> Cow<'_, str> {
	match text.char_indices().nth(budget) {
		None => Cow::Borrowed(text),
		Some((cut, _)) => {
			let mut out = String::with_capacity(cut + ELLIPSIS.len_utf8());
			out.push_str(&text[..cut]);
			out.push(ELLIPSIS);
			Cow::Owned(out)
		}
	}
}

/// Separator placed between the input and the file name.
pub fn position_label(start: Position) -> String {
	format!(" ({}:{}) ", start.row, start.column)
}

/// Builds a title from the query input and, when present, the selected file.
///
/// With a file, input and file name each get half the budget, so a long input
/// is cut to 11 characters plus an ellipsis at the default of 22. Without a file
/// the input may use the whole budget and is only cut past 22 characters, which
/// keeps a query such as "null pointer" whole.
pub fn panel_title(input: &str, file_name: Option<&str>, position: &str, budget: usize) -> String {
	let Some(file_name) = file_name else {
		return truncate(input, budget).into_owned();
	};
	let half = budget / 2;
	let mut title = truncate(input, half).into_owned();
	title.push_str(position);
	title.push_str(&truncate(file_name, half));
	title
}

pub fn title_for_query(query: &Query, budget: usize) -> String {
	match &query.code_selection {
		Some(selection) => panel_title(&query.input, Some(selection.file_name()), &position_label(selection.start), budget),
		None => panel_title(&query.input, None, "", budget),
	}
}
