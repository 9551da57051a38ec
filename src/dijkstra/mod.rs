// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

mod pathfinder;
mod route;
mod search;

pub use pathfinder::Pathfinder;
pub use route::{Route, RouteSummary};
pub use search::find_route;
