use crate::config::ServerSettings;
use actix_files::Files;
use actix_web::http::header;
use actix_web::{web, HttpResponse};

pub fn configure_routes(cfg: &mut web::ServiceConfig, settings: &ServerSettings) {
    if settings.base_path != "/" {
        cfg.service(web::resource("/").route(web::get().to(redirect_to_app)));
    }
    cfg.service(
        Files::new(settings.mount_path(), &settings.dist_dir)
            .index_file("index.html")
            .use_last_modified(true),
    );
}

async fn redirect_to_app(settings: web::Data<ServerSettings>) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, settings.base_path.clone()))
        .finish()
}
