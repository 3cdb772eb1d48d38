use actix_web::web;

use crate::handlers::{level, submit, system};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/ads")
            .service(web::resource("/submit").route(web::post().to(submit::submit_ad))),
    );

    cfg.service(web::resource("/proxy/level").route(web::post().to(level::check_level)));

    cfg.service(system::health_check);
}
