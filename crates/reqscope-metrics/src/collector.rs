// Copyright (C) 2026  winnyboy5
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.
//! Collectors sampled lazily at snapshot time

use crate::descriptor::MetricDescriptor;
use crate::snapshot::MetricFamily;

/// Source of metric families that are computed on every snapshot
///
/// A collector declares its descriptors when registered so the registry can
/// reserve the names. `collect` may return a subset of them: a family whose
/// source could not be read is simply left out.
pub trait Collector: Send + Sync {
    /// Every family this collector may produce
    fn descriptors(&self) -> Vec<MetricDescriptor>;

    /// Sample current values
    fn collect(&self) -> Vec<MetricFamily>;
}
