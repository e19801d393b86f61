//! Rocket routes over the shared article controller.
//!
//! Each handler turns its rocket guards into a [`Route`] plus params and lets
//! [`App::perform`] run the action. Redirect notices travel in rocket's flash
//! cookie instead of the in-process flash used by `App::request`.

use blog_core::web::controller::Response;
use blog_core::web::params::build_params;
use blog_core::web::routes::Route;
use blog_core::web::views::Page;
use blog_core::{App, ArticleId, ArticleParams};
use log::{debug, error};
use rocket::form::Form;
use rocket::http::Status;
use rocket::request::FlashMessage;
use rocket::response::content::RawHtml;
use rocket::response::{Flash, Redirect};
use rocket::{Build, Request, Rocket, State};
use std::sync::Mutex;

/// The app behind a lock; handlers run one action at a time.
pub struct SharedApp(Mutex<App>);

/// Submitted article form. Names match the fields rendered by the form page.
#[derive(Debug, FromForm)]
pub struct ArticleFields {
    title: Option<String>,
    body: Option<String>,
    /// Every submitted value; the hidden `0` comes before the checkbox's `1`.
    active: Vec<String>,
}

impl ArticleFields {
    fn into_params(self) -> ArticleParams {
        let ArticleFields {
            title,
            body,
            active,
        } = self;
        build_params(title, body, active.last().map(String::as_str))
    }
}

#[derive(Responder)]
pub enum Reply {
    Page((Status, RawHtml<String>)),
    Redirect(Flash<Redirect>),
}

pub fn rocket_server(app: App) -> Rocket<Build> {
    rocket::build()
        .manage(SharedApp(Mutex::new(app)))
        .mount(
            "/",
            routes![
                home,
                index,
                new_article,
                create,
                show,
                edit,
                update,
                replace,
                destroy
            ],
        )
        .register("/", catchers![not_found, fallback])
}

fn perform(
    app: &SharedApp,
    route: Route,
    params: ArticleParams,
    flash: Option<FlashMessage<'_>>,
) -> Reply {
    debug!("event=request module=server route={route:?}");
    let response = match app.0.lock() {
        Ok(app) => app.perform(route, params),
        Err(_) => {
            error!("event=request module=server status=error error_code=app_lock_poisoned");
            Response::Page(Page::server_error())
        }
    };

    match response {
        Response::Page(page) => {
            let notice = flash.as_ref().map(FlashMessage::message);
            Reply::Page(render(&page, notice))
        }
        Response::Redirect { location, notice } => {
            Reply::Redirect(Flash::success(Redirect::to(location), notice))
        }
    }
}

fn render(page: &Page, notice: Option<&str>) -> (Status, RawHtml<String>) {
    (Status::new(page.status.code()), RawHtml(page.render(notice)))
}

#[get("/")]
fn home(app: &State<SharedApp>, flash: Option<FlashMessage<'_>>) -> Reply {
    perform(app, Route::Home, ArticleParams::default(), flash)
}

#[get("/articles")]
fn index(app: &State<SharedApp>, flash: Option<FlashMessage<'_>>) -> Reply {
    perform(app, Route::Index, ArticleParams::default(), flash)
}

#[get("/articles/new")]
fn new_article(app: &State<SharedApp>, flash: Option<FlashMessage<'_>>) -> Reply {
    perform(app, Route::New, ArticleParams::default(), flash)
}

#[post("/articles", data = "<fields>")]
fn create(
    app: &State<SharedApp>,
    flash: Option<FlashMessage<'_>>,
    fields: Form<ArticleFields>,
) -> Reply {
    perform(app, Route::Create, fields.into_inner().into_params(), flash)
}

#[get("/articles/<id>")]
fn show(app: &State<SharedApp>, flash: Option<FlashMessage<'_>>, id: ArticleId) -> Reply {
    perform(app, Route::Show(id), ArticleParams::default(), flash)
}

#[get("/articles/<id>/edit")]
fn edit(app: &State<SharedApp>, flash: Option<FlashMessage<'_>>, id: ArticleId) -> Reply {
    perform(app, Route::Edit(id), ArticleParams::default(), flash)
}

#[patch("/articles/<id>", data = "<fields>")]
fn update(
    app: &State<SharedApp>,
    flash: Option<FlashMessage<'_>>,
    id: ArticleId,
    fields: Form<ArticleFields>,
) -> Reply {
    perform(app, Route::Update(id), fields.into_inner().into_params(), flash)
}

#[put("/articles/<id>", data = "<fields>")]
fn replace(
    app: &State<SharedApp>,
    flash: Option<FlashMessage<'_>>,
    id: ArticleId,
    fields: Form<ArticleFields>,
) -> Reply {
    perform(app, Route::Update(id), fields.into_inner().into_params(), flash)
}

#[delete("/articles/<id>")]
fn destroy(app: &State<SharedApp>, flash: Option<FlashMessage<'_>>, id: ArticleId) -> Reply {
    perform(app, Route::Destroy(id), ArticleParams::default(), flash)
}

#[catch(404)]
fn not_found() -> (Status, RawHtml<String>) {
    render(&Page::not_found(), None)
}

// Unparseable ids and bad form bodies land here with a 4xx status.
#[catch(default)]
fn fallback(status: Status, _request: &Request<'_>) -> (Status, RawHtml<String>) {
    let page = if status.code < 500 {
        Page::not_found()
    } else {
        Page::server_error()
    };
    (status, RawHtml(page.render(None)))
}
