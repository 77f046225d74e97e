use todo_core::controller::Event as AppEvent;
use todo_core::render::ItemView;
use yew::{
  Callback,
  Html,
  Properties,
  function_component,
  html
};

use super::ItemRow;

#[derive(Properties, PartialEq)]
pub struct ItemListProps {
  pub items:    Vec<ItemView>,
  pub on_event: Callback<AppEvent>
}

#[function_component(ItemList)]
pub fn item_list(
  props: &ItemListProps
) -> Html {
  html! {
      <div id="well">
          {
              for props.items.iter().cloned().map(|item| html! {
                  <ItemRow
                      key={item.id.to_string()}
                      item={item.clone()}
                      on_event={props.on_event.clone()}
                  />
              })
          }
      </div>
  }
}
