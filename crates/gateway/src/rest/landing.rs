//! Empty-state landing page and the new-room form

use axum::response::Html;

const LANDING_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Parley</title>
</head>
<body>
  <main class="empty-state">
    <svg class="empty-state-icon" xmlns="http://www.w3.org/2000/svg" width="48" height="48" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round" aria-hidden="true">
      <path d="M21 15a2 2 0 0 1-2 2H7l-4 4V5a2 2 0 0 1 2-2h14a2 2 0 0 1 2 2z"/>
    </svg>
    <h1 class="empty-state-title">No Chat Rooms</h1>
    <p class="empty-state-description">Create a new chat room to get started</p>
    <a class="button" href="rooms/new">Create Room</a>
  </main>
</body>
</html>
"#;

const NEW_ROOM_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>New room · Parley</title>
</head>
<body>
  <main>
    <h1>Create Room</h1>
    <form id="new-room" method="post" action="/api/rooms">
      <label>Name <input name="name" required maxlength="100"></label>
      <label><input type="checkbox" name="isPublic"> Public</label>
      <label>Session token <input name="token" type="password" autocomplete="off"></label>
      <button type="submit">Create</button>
    </form>
    <p id="result" role="status"></p>
  </main>
  <script>
    const form = document.getElementById("new-room");
    const result = document.getElementById("result");
    form.token.value = localStorage.getItem("parley.token") || "";
    form.addEventListener("submit", async (event) => {
      event.preventDefault();
      localStorage.setItem("parley.token", form.token.value);
      const response = await fetch("/api/rooms", {
        method: "POST",
        headers: {
          "Content-Type": "application/json",
          "Authorization": "Bearer " + form.token.value,
        },
        body: JSON.stringify({ name: form.name.value, isPublic: form.isPublic.checked }),
      });
      if (response.redirected) {
        result.textContent = "Room created: " + new URL(response.url).pathname;
        return;
      }
      const body = await response.json();
      result.textContent = body.message;
    });
  </script>
</body>
</html>
"#;

#[utoipa::path(
    get,
    path = "/",
    tag = "Pages",
    responses(
        (status = 200, description = "Empty-state landing page", content_type = "text/html", body = String)
    )
)]
pub async fn landing_page() -> Html<&'static str> {
    Html(LANDING_PAGE)
}

#[utoipa::path(
    get,
    path = "/rooms/new",
    tag = "Pages",
    responses(
        (status = 200, description = "Form that submits to the create-room action", content_type = "text/html", body = String)
    )
)]
pub async fn new_room_page() -> Html<&'static str> {
    Html(NEW_ROOM_PAGE)
}
