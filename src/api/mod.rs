pub mod admin;
pub mod bookings;
pub mod frontend;
pub mod health;
pub mod payments;
pub mod reviews;
pub mod services;
pub mod swagger;
pub mod users;


use crate::middleware::Gates;
use actix_web::{guard, web};

/// Route table. Paths whose methods need different gates are split into
/// one resource per method.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(frontend::redirect_to_frontend))
        .route("/health", web::get().to(health::health_check))
        // Users
        .service(
            web::resource("/admin/{uid}")
                .wrap(Gates::user())
                .route(web::get().to(admin::check_admin)),
        )
        .service(
            web::resource("/users")
                .wrap(Gates::user())
                .route(web::post().to(users::upsert_user)),
        )
        // Reviews: listing is public
        .service(
            web::resource("/reviews")
                .guard(guard::Get())
                .to(reviews::list_reviews),
        )
        .service(
            web::resource("/reviews")
                .guard(guard::Post())
                .wrap(Gates::user())
                .to(reviews::create_review),
        )
        .service(
            web::resource("/reviews/{uid}")
                .wrap(Gates::user())
                .route(web::get().to(reviews::get_review))
                .route(web::patch().to(reviews::update_review)),
        )
        // Services: anyone signed in may browse, only admins manage
        .service(
            web::resource("/services")
                .guard(guard::Get())
                .wrap(Gates::user())
                .to(services::list_services),
        )
        .service(
            web::resource("/services")
                .guard(guard::Post())
                .wrap(Gates::admin())
                .to(services::create_service),
        )
        .service(
            web::resource("/services/{id}")
                .wrap(Gates::admin())
                .route(web::patch().to(services::update_service))
                .route(web::delete().to(services::delete_service)),
        )
        // Bookings and payments
        .service(
            web::resource("/bookings")
                .wrap(Gates::admin())
                .route(web::get().to(bookings::list_bookings)),
        )
        .service(
            web::resource("/bookings/{uid}")
                .guard(guard::Get())
                .wrap(Gates::user())
                .to(bookings::list_user_bookings),
        )
        .service(
            web::resource("/bookings/{id}")
                .guard(guard::Patch())
                .wrap(Gates::admin())
                .to(bookings::update_booking),
        )
        .service(
            web::resource("/create-payment-intent")
                .wrap(Gates::user())
                .route(web::post().to(payments::create_payment_intent)),
        )
        .service(
            web::resource("/payments")
                .wrap(Gates::user())
                .route(web::post().to(bookings::record_booking)),
        );
}
