// router.rs
//
// Copyright 2017 Jordan Petridis <jpetridis@gnome.org>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.
//
// SPDX-License-Identifier: GPL-3.0-or-later

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::Router;

use std::time::Instant;

use catalog_data::{Contributor, Episode, Podcast, Season};

use crate::handlers;
use crate::resources::Resource;
use crate::state::AppState;

/// The whole api.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(resource_routes::<Contributor>())
        .merge(resource_routes::<Podcast>())
        .merge(resource_routes::<Season>())
        .merge(resource_routes::<Episode>())
        .fallback(handlers::fallback)
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

fn resource_routes<R: Resource>() -> Router<AppState> {
    let collection = format!("/{}", R::KIND);

    Router::new()
        .route(
            &collection,
            get(handlers::search::<R>).post(handlers::create::<R>),
        )
        .route(
            &format!("{}/{{id}}", collection),
            get(handlers::read::<R>)
                .patch(handlers::update::<R>)
                .delete(handlers::delete::<R>),
        )
        .route(
            &format!("{}/{{id}}/{{relationship}}", collection),
            get(handlers::read_related::<R>),
        )
        .route(
            &format!("{}/{{id}}/relationships/{{relationship}}", collection),
            get(handlers::relationship::<R>)
                .post(handlers::add_related::<R>)
                .delete(handlers::remove_related::<R>)
                .patch(handlers::patch_related::<R>),
        )
}

async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let start = Instant::now();

    let res = next.run(req).await;
    info!(
        "{} {} {} {:.1?}",
        method,
        path,
        res.status().as_u16(),
        start.elapsed()
    );
    res
}
