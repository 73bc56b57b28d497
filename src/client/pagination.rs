// This file is part of the terraform-provider-ise project
//
// Copyright (C) ANEO, 2024-2024. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License")
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::future::Future;

use url::Url;

use super::ApiError;

/// Page coordinates of a list call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 1, size: 20 }
    }
}

/// One page of a list response
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// `href` of the `nextPage` link, if the server announced one
    pub next: Option<String>,
}

/// Items accumulated by [`walk`].
///
/// `interrupted` holds the error that stopped the walk early, if any; `items`
/// then only contains the pages fetched before the failure.
#[derive(Debug, Clone, PartialEq)]
pub struct Walk<T> {
    pub items: Vec<T>,
    pub interrupted: Option<ApiError>,
}

/// Parse the page coordinates out of a `nextPage` link.
///
/// Relative links are accepted. Missing `size` keeps the current page size.
pub fn next_page(href: &str, current: PageRequest) -> Option<PageRequest> {
    let url = match Url::parse(href) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse("http://localhost/")
            .ok()?
            .join(href)
            .ok()?,
        Err(_) => return None,
    };

    let mut next = PageRequest {
        page: current.page.checked_add(1)?,
        size: current.size,
    };
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "page" => next.page = value.parse().ok()?,
            "size" => next.size = value.parse().ok()?,
            _ => {}
        }
    }
    Some(next)
}

/// Follow `nextPage` links from `first` until the server stops announcing one.
///
/// A link that does not move forward ends the walk.
pub async fn walk<T, F, Fut>(first: PageRequest, mut fetch: F) -> Walk<T>
where
    F: FnMut(PageRequest) -> Fut,
    Fut: Future<Output = Result<Page<T>, ApiError>>,
{
    let mut items = Vec::new();
    let mut current = first;

    loop {
        let page = match fetch(current).await {
            Ok(page) => page,
            Err(err) => {
                tracing::warn!(page = current.page, error = %err, "list walk interrupted");
                return Walk {
                    items,
                    interrupted: Some(err),
                };
            }
        };
        items.extend(page.items);

        match page.next.and_then(|href| next_page(&href, current)) {
            Some(next) if next.page > current.page => current = next,
            _ => break,
        }
    }

    Walk {
        items,
        interrupted: None,
    }
}
