//! Sorted, non-overlapping frame ranges with binary-search lookup.

use serde::Deserialize;

/// Inclusive frame range carrying a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Span<T> {
	/// First frame of the range
	pub first: usize,
	/// Last frame of the range (inclusive); defaults to `first`
	#[serde(default)]
	pub last: Option<usize>,
	/// Value applied to every frame in the range
	pub value: T,
}

impl<T> Span<T> {
	/// Creates a span covering `first..=last`.
	pub fn new(first: usize, last: usize, value: T) -> Self {
		Self {
			first,
			last: Some(last),
			value,
		}
	}

	/// Returns the last frame covered by the span.
	#[inline]
	pub fn end(&self) -> usize {
		self.last.unwrap_or(self.first)
	}
}

/// Per-frame overrides, looked up in `O(log n)` on the number of ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameRanges<T> {
	spans: Vec<Span<T>>,
}

impl<T: Copy> FrameRanges<T> {
	/// Builds a lookup table, sorting the spans by their first frame.
	///
	/// # Errors
	///
	/// Returns a description of the problem if a span ends before it starts or
	/// two spans overlap.
	pub fn new(mut spans: Vec<Span<T>>) -> Result<Self, String> {
		spans.sort_by_key(|s| s.first);
		for span in &spans {
			if span.end() < span.first {
				return Err(format!("range {}..={} ends before it starts", span.first, span.end()));
			}
		}
		for pair in spans.windows(2) {
			if pair[1].first <= pair[0].end() {
				return Err(format!(
					"range starting at {} overlaps range {}..={}",
					pair[1].first,
					pair[0].first,
					pair[0].end()
				));
			}
		}
		Ok(Self {
			spans,
		})
	}

	/// Returns the value of the range containing `frame`, if any.
	pub fn get(&self, frame: usize) -> Option<T> {
		let idx = self.spans.partition_point(|s| s.first <= frame);
		let span = self.spans.get(idx.checked_sub(1)?)?;
		(frame <= span.end()).then_some(span.value)
	}

	/// Returns `true` when no overrides are defined.
	pub fn is_empty(&self) -> bool {
		self.spans.is_empty()
	}

	/// Returns the spans in frame order.
	pub fn spans(&self) -> &[Span<T>] {
		&self.spans
	}
}

impl<T> Default for FrameRanges<T> {
	fn default() -> Self {
		Self {
			spans: Vec::new(),
		}
	}
}
