use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/records", record_routes())
        .nest("/places", place_routes())
        .nest("/publications", publication_routes())
}

fn record_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::record::list_records))
        .routes(routes!(handlers::record::publish_records))
        .routes(routes!(handlers::record::get_record))
}

fn place_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::place::list_places))
        .routes(routes!(handlers::place::fetch_coordinates))
        .routes(routes!(
            handlers::place::update_place,
            handlers::place::delete_place
        ))
}

fn publication_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::publication::delete_publication))
}
