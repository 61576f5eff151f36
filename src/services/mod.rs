// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

pub mod fixture;
pub mod handler;
pub mod indexer;
pub mod logging;
pub mod query;
pub mod reducer;
pub mod search;
